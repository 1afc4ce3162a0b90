//! Packing of `(rank, tier, insertion counter)` into a totally ordered `u128`.
//!
//! From the most significant bits down: the rank mapped so that ascending unsigned order means
//! descending rank, a caller-chosen tier (lower tiers first), and the insertion counter, so
//! earlier inserts of the same rank and tier come first.

use crate::Rank;

const RANK_FLIP: u32 = 0x7FFF_FFFF;

/// Sort key of one element.
pub type Uid = u128;

#[inline]
const fn flip(rank: Rank) -> u32 {
	(rank as u32) ^ RANK_FLIP
}

/// Packs a rank, a tier and a uniqueness counter into a sort key.
#[inline]
pub const fn pack(rank: Rank, tier: u64, uniq: u32) -> Uid {
	(flip(rank) as Uid) << 96 | (tier as Uid) << 32 | uniq as Uid
}

/// Recovers the rank from a sort key produced by [`pack`].
#[inline]
pub const fn rank_of(uid: Uid) -> Rank {
	flip((uid >> 96) as u32 as Rank) as Rank
}

/// Builds a tier ordering by `rank` descending, then by `ordinal` ascending.
///
/// Useful when elements inherit their tie-break from a ranked owner, such as the position of the
/// owner in another sequence.
#[inline]
pub const fn tier(rank: Rank, ordinal: u32) -> u64 {
	(flip(rank) as u64) << 32 | ordinal as u64
}
