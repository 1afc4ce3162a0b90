use std::sync::Arc;

use arc_swap::Guard;

use crate::error::RankedError;
use crate::sequence::{Content, RankedSequence};
use crate::Rank;
use crate::uid::{self, Uid};

/// Live cursor over a [`RankedSequence`].
///
/// The cursor tracks the uid just past the last element it returned instead of a raw index, and
/// re-locates itself whenever the sequence publishes a new snapshot.
pub struct Cursor<'a, T> {
	sequence: &'a RankedSequence<T>,
	snapshot: Arc<Content<T>>,
	/// Every element still to be returned has a uid `>= floor`.
	floor: Uid,
	index: usize,
	last_rank: Option<Rank>,
}

impl<'a, T: Clone> Cursor<'a, T> {
	pub(crate) fn new(sequence: &'a RankedSequence<T>) -> Self {
		Self {
			sequence,
			snapshot: sequence.content.load_full(),
			floor: 0,
			index: 0,
			last_rank: None,
		}
	}

	fn sync(&mut self) {
		let latest = self.sequence.content.load();
		if !Arc::ptr_eq(&latest, &self.snapshot) {
			self.snapshot = Guard::into_inner(latest);
			self.index = self.snapshot.position_of(self.floor);
		}
	}

	/// Returns `true` when another element is available.
	pub fn has_next(&mut self) -> bool {
		self.sync();
		self.index < self.snapshot.objs.len()
	}

	/// Returns the rank of the element [`Cursor::next`] would return.
	pub fn peek_rank(&mut self) -> Option<Rank> {
		self.sync();
		self.snapshot.uids.get(self.index).map(|&uid| uid::rank_of(uid))
	}

	/// Returns `true` when the next element exists and ranks at least `rank`.
	pub fn has_next_at_least(&mut self, rank: Rank) -> bool {
		self.peek_rank().is_some_and(|next| next >= rank)
	}

	/// Rank of the element most recently returned.
	pub fn rank(&self) -> Option<Rank> {
		self.last_rank
	}

	/// Like [`Iterator::next`], but reports exhaustion as an error.
	pub fn try_next(&mut self) -> Result<T, RankedError> {
		self.next().ok_or(RankedError::NoSuchElement)
	}
}

impl<T: Clone> Iterator for Cursor<'_, T> {
	type Item = T;

	fn next(&mut self) -> Option<T> {
		self.sync();
		let element = self.snapshot.objs.get(self.index)?.clone();
		let uid = self.snapshot.uids[self.index];
		self.floor = uid.saturating_add(1);
		self.index += 1;
		self.last_rank = Some(uid::rank_of(uid));
		Some(element)
	}
}
