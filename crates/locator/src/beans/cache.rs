use std::sync::Arc;

use arc_swap::ArcSwap;
use bindery_ranked::Rank;
use rustc_hash::{FxHashMap, FxHashSet};

use super::BeanEntry;
use crate::binding::{Binding, BindingId};
use crate::key::{Contract, Qualifier};

pub(crate) type Entries<T> = FxHashMap<BindingId, BeanEntry<T>>;

/// Binding-identity keyed memo of realized entries for one located view.
///
/// Published as an immutable map; racing creators for the same binding converge on whichever
/// entry won the swap.
pub(crate) struct BeanCache<T: ?Sized + Contract> {
	entries: ArcSwap<Entries<T>>,
}

impl<T: ?Sized + Contract> Default for BeanCache<T> {
	fn default() -> Self {
		Self {
			entries: ArcSwap::from_pointee(FxHashMap::default()),
		}
	}
}

impl<T: ?Sized + Contract> BeanCache<T> {
	/// Returns the cached entry for `binding`, creating it if absent.
	pub(crate) fn create(&self, qualifier: Qualifier, binding: Arc<Binding<T>>, rank: Rank) -> BeanEntry<T> {
		let id = binding.id();
		let fresh = BeanEntry::new(qualifier, binding, rank);
		loop {
			let current = self.entries.load_full();
			if let Some(existing) = current.get(&id) {
				return existing.clone();
			}
			let mut next = (*current).clone();
			next.insert(id, fresh.clone());
			let prev = self.entries.compare_and_swap(&current, Arc::new(next));
			if Arc::ptr_eq(&prev, &current) {
				return fresh;
			}
		}
	}

	pub(crate) fn remove(&self, id: BindingId) -> Option<BeanEntry<T>> {
		loop {
			let current = self.entries.load_full();
			let existing = current.get(&id)?.clone();
			let mut next = (*current).clone();
			next.remove(&id);
			let prev = self.entries.compare_and_swap(&current, Arc::new(next));
			if Arc::ptr_eq(&prev, &current) {
				tracing::trace!(binding = %id, "evicted bean entry");
				return Some(existing);
			}
		}
	}

	/// Drops entries whose binding is no longer in `active`.
	pub(crate) fn flush(&self, active: &FxHashSet<BindingId>) {
		loop {
			let current = self.entries.load_full();
			if current.keys().all(|id| active.contains(id)) {
				return;
			}
			let next: Entries<T> = current
				.iter()
				.filter(|(id, _)| active.contains(*id))
				.map(|(id, entry)| (*id, entry.clone()))
				.collect();
			let prev = self.entries.compare_and_swap(&current, Arc::new(next));
			if Arc::ptr_eq(&prev, &current) {
				return;
			}
		}
	}

	pub(crate) fn snapshot(&self) -> Arc<Entries<T>> {
		self.entries.load_full()
	}

	pub(crate) fn len(&self) -> usize {
		self.entries.load().len()
	}
}
