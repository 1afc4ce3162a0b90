//! Rank-ordered sequences.
//!
//! # Purpose
//!
//! [`RankedSequence`] keeps elements sorted by an externally assigned [`Rank`] (higher first)
//! while preserving insertion order among equal ranks. It is the ordering primitive shared by
//! the bean locator for both its source list and its imported bindings.
//!
//! # Mental Model
//!
//! Every insert packs `(rank, tier, insertion counter)` into a single `u128` uid (see [`uid`]). The
//! uids of a sequence are therefore unique and their ascending order is exactly the iteration
//! order. The sequence publishes immutable snapshots through an
//! [`arc_swap::ArcSwap`]; writers run a CAS retry loop and readers never block.
//!
//! A [`Cursor`] remembers the uid just past the last element it returned. Whenever it notices a
//! newer snapshot it binary-searches that uid again, so concurrent inserts ahead of the cursor
//! are observed exactly once and removals never invalidate it.
//!
//! # Invariants
//!
//! - Iteration order is rank descending, then tier ascending, then insertion order ascending.
//!   - Enforced in: [`uid::pack`], [`RankedSequence::insert`].
//!   - Tested by: `tests::equal_ranks_keep_insertion_order`, `tests::prop_iteration_is_sorted`.
//! - A uid collision is impossible by construction and treated as fatal.
//!   - Enforced in: [`RankedSequence::insert`].
//! - Cursors never fail on concurrent mutation.
//!   - Enforced in: [`Cursor`] re-location by uid.
//!   - Tested by: `tests::cursor_sees_inserts_ahead_once`, `tests::cursor_survives_removals`.

mod cursor;
mod error;
mod sequence;
pub mod uid;

pub use cursor::Cursor;
pub use error::RankedError;
pub use sequence::RankedSequence;

/// Externally assigned ordering priority; higher ranks sort first.
pub type Rank = i32;
