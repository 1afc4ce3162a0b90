//! Located views: qualified entries realized on demand and memoized per view.
//!
//! # Role
//!
//! [`LocatedBeans`] pairs one request with the shared `RankedBindings`
//! of its contract. Iterating applies the qualifying strategy to each binding and turns matches
//! into [`BeanEntry`] handles, cached by binding identity.
//!
//! # Invariants
//!
//! - A binding yields the same entry object for the lifetime of its view.
//!   - Enforced in: `BeanCache::create`
//!   - Tested by: `beans::tests::entries_are_stable_across_passes`
//! - An entry provisions at most once after its first success.
//!   - Enforced in: `BeanEntry::value`
//!   - Tested by: `beans::tests::racing_first_values_run_the_factory_once`

mod cache;
mod entry;
mod located;

pub(crate) use cache::{BeanCache, Entries};
pub use entry::BeanEntry;
pub use located::{BeanIter, LocatedBeans};
