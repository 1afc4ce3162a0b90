//! Copy-on-write ranked storage.
//!
//! # Role
//!
//! Owns the published [`Content`] and implements every mutation as a CAS retry loop, in the same
//! way runtime registries publish their snapshots. Nothing here holds a lock.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use arc_swap::ArcSwap;

use crate::cursor::Cursor;
use crate::error::RankedError;
use crate::uid::{self, Uid};
use crate::Rank;

/// Immutable state of a sequence at one point in time.
pub(crate) struct Content<T> {
	pub(crate) objs: Vec<T>,
	pub(crate) uids: Vec<Uid>,
}

impl<T> Default for Content<T> {
	fn default() -> Self {
		Self {
			objs: Vec::new(),
			uids: Vec::new(),
		}
	}
}

impl<T: Clone> Content<T> {
	/// Index of the first element whose uid is `>= uid`.
	#[inline]
	pub(crate) fn position_of(&self, uid: Uid) -> usize {
		match self.uids.binary_search(&uid) {
			Ok(index) | Err(index) => index,
		}
	}

	fn with_inserted(&self, index: usize, element: T, uid: Uid) -> Self {
		let mut objs = Vec::with_capacity(self.objs.len() + 1);
		objs.extend_from_slice(&self.objs[..index]);
		objs.push(element);
		objs.extend_from_slice(&self.objs[index..]);

		let mut uids = Vec::with_capacity(self.uids.len() + 1);
		uids.extend_from_slice(&self.uids[..index]);
		uids.push(uid);
		uids.extend_from_slice(&self.uids[index..]);

		Self { objs, uids }
	}

	fn without(&self, index: usize) -> Self {
		let mut objs = self.objs.clone();
		let mut uids = self.uids.clone();
		objs.remove(index);
		uids.remove(index);
		Self { objs, uids }
	}
}

/// Sorted sequence of elements, ordered by rank (descending), tier, then insertion (ascending).
///
/// Thread-safe; share it behind an `Arc` or embed it in a shared structure.
pub struct RankedSequence<T> {
	pub(crate) content: ArcSwap<Content<T>>,
	uniq: AtomicU32,
}

impl<T> Default for RankedSequence<T> {
	fn default() -> Self {
		Self {
			content: ArcSwap::from_pointee(Content::default()),
			uniq: AtomicU32::new(0),
		}
	}
}

impl<T> std::fmt::Debug for RankedSequence<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RankedSequence")
			.field("len", &self.content.load().objs.len())
			.finish()
	}
}

impl<T: Clone> RankedSequence<T> {
	/// Creates an empty sequence.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a sequence holding the same elements as `other`.
	///
	/// Later inserts into either sequence keep ordering relative to the copied elements, so two
	/// sequences fed the same inserts stay in the same order.
	pub fn from_sequence(other: &Self) -> Self {
		Self {
			content: ArcSwap::new(other.content.load_full()),
			uniq: AtomicU32::new(other.uniq.load(Ordering::Acquire)),
		}
	}

	/// Inserts `element` at the position dictated by `rank`.
	///
	/// # Panics
	///
	/// Panics if the generated uid already exists, which would mean the uniqueness counter
	/// wrapped around.
	pub fn insert(&self, element: T, rank: Rank) {
		self.insert_tiered(element, rank, 0);
	}

	/// Inserts `element` ordered by `rank`, then by `tier` among equal ranks.
	///
	/// Elements sharing both rank and tier keep insertion order. Plain [`RankedSequence::insert`]
	/// uses tier `0`.
	///
	/// # Panics
	///
	/// Panics if the generated uid already exists.
	pub fn insert_tiered(&self, element: T, rank: Rank, tier: u64) {
		let uid = uid::pack(rank, tier, self.uniq.fetch_add(1, Ordering::AcqRel));
		loop {
			let current = self.content.load_full();
			let index = match current.uids.binary_search(&uid) {
				Ok(_) => panic!("ranked sequence uid collision: uid={uid:#034x} rank={rank} tier={tier}"),
				Err(index) => index,
			};
			let next = Arc::new(current.with_inserted(index, element.clone(), uid));
			let prev = self.content.compare_and_swap(&current, next);
			if Arc::ptr_eq(&prev, &current) {
				return;
			}
		}
	}

	/// Removes the first element matching `pred`; returns whether anything was removed.
	pub fn remove_where(&self, mut pred: impl FnMut(&T) -> bool) -> bool {
		loop {
			let current = self.content.load_full();
			let Some(index) = current.objs.iter().position(&mut pred) else {
				return false;
			};
			let next = Arc::new(current.without(index));
			let prev = self.content.compare_and_swap(&current, next);
			if Arc::ptr_eq(&prev, &current) {
				return true;
			}
		}
	}

	/// Returns the element at `index`.
	pub fn get(&self, index: usize) -> Result<T, RankedError> {
		let content = self.content.load();
		content
			.objs
			.get(index)
			.cloned()
			.ok_or(RankedError::IndexOutOfBounds {
				index,
				len: content.objs.len(),
			})
	}

	/// Returns the rank of the element at `index`.
	pub fn rank_at(&self, index: usize) -> Result<Rank, RankedError> {
		let content = self.content.load();
		content
			.uids
			.get(index)
			.map(|&uid| uid::rank_of(uid))
			.ok_or(RankedError::IndexOutOfBounds {
				index,
				len: content.uids.len(),
			})
	}

	/// Returns the highest-ranked element without removing it.
	pub fn peek(&self) -> Option<T> {
		self.content.load().objs.first().cloned()
	}

	/// Returns the highest rank currently held.
	pub fn top_rank(&self) -> Option<Rank> {
		self.content.load().uids.first().map(|&uid| uid::rank_of(uid))
	}

	/// Returns `true` when any element matches `pred`.
	pub fn contains_where(&self, pred: impl FnMut(&T) -> bool) -> bool {
		self.content.load().objs.iter().any(pred)
	}

	/// Returns the first element matching `pred`.
	pub fn find(&self, mut pred: impl FnMut(&T) -> bool) -> Option<T> {
		self.content.load().objs.iter().find(|e| pred(e)).cloned()
	}

	/// Returns the number of elements.
	pub fn len(&self) -> usize {
		self.content.load().objs.len()
	}

	/// Returns `true` when the sequence is empty.
	pub fn is_empty(&self) -> bool {
		self.content.load().objs.is_empty()
	}

	/// Removes every element.
	pub fn clear(&self) {
		self.content.store(Arc::new(Content::default()));
	}

	/// Copies the current elements in iteration order.
	pub fn snapshot(&self) -> Vec<T> {
		self.content.load().objs.clone()
	}

	/// Returns a live cursor starting before the highest-ranked element.
	pub fn iter(&self) -> Cursor<'_, T> {
		Cursor::new(self)
	}
}

impl<U: ?Sized> RankedSequence<Arc<U>> {
	/// Removes `element` by pointer identity; returns whether it was present.
	pub fn remove_this(&self, element: &Arc<U>) -> bool {
		self.remove_where(|e| Arc::ptr_eq(e, element))
	}
}

impl<'a, T: Clone> IntoIterator for &'a RankedSequence<T> {
	type Item = T;
	type IntoIter = Cursor<'a, T>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}
