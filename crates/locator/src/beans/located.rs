use std::fmt;
use std::sync::Arc;

use super::{BeanCache, BeanEntry, Entries};
use crate::error::LocatorError;
use crate::key::{Contract, Key};
use crate::qualify::QualifyingStrategy;
use crate::ranked_bindings::{RankedBindings, RankedIter};

/// Restartable, live view of every bean matching one [`Key`].
///
/// Each [`LocatedBeans::iter`] call reflects the sources registered at that moment. Entries are
/// memoized by binding identity, so every pass yields the same [`BeanEntry`] for a binding.
pub struct LocatedBeans<T: ?Sized + Contract> {
	key: Key<T>,
	strategy: QualifyingStrategy,
	bindings: Arc<RankedBindings<T>>,
	cache: Arc<BeanCache<T>>,
}

impl<T: ?Sized + Contract> LocatedBeans<T> {
	pub(crate) fn new(key: Key<T>, bindings: Arc<RankedBindings<T>>) -> Self {
		let cache = Arc::new(BeanCache::default());
		bindings.track(&cache);
		Self {
			strategy: QualifyingStrategy::select_for(key.qualifier()),
			key,
			bindings,
			cache,
		}
	}

	pub fn key(&self) -> &Key<T> {
		&self.key
	}

	pub fn strategy(&self) -> QualifyingStrategy {
		self.strategy
	}

	/// Starts a new pass over the matching beans.
	pub fn iter(&self) -> BeanIter<'_, T> {
		self.cache.flush(&self.bindings.active_ids());
		BeanIter {
			beans: self,
			bindings: self.bindings.iter(),
			memo: self.cache.snapshot(),
		}
	}

	/// Number of entries realized so far.
	pub fn realized(&self) -> usize {
		self.cache.len()
	}

	/// Returns `true` when the next pass would yield nothing.
	pub fn is_empty(&self) -> bool {
		self.iter().next().is_none()
	}
}

impl<'a, T: ?Sized + Contract> IntoIterator for &'a LocatedBeans<T> {
	type Item = BeanEntry<T>;
	type IntoIter = BeanIter<'a, T>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

impl<T: ?Sized + Contract> fmt::Debug for LocatedBeans<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LocatedBeans")
			.field("key", &self.key)
			.field("strategy", &self.strategy)
			.field("realized", &self.cache.len())
			.finish()
	}
}

/// One pass over a [`LocatedBeans`].
pub struct BeanIter<'a, T: ?Sized + Contract> {
	beans: &'a LocatedBeans<T>,
	bindings: RankedIter<'a, T>,
	memo: Arc<Entries<T>>,
}

impl<T: ?Sized + Contract> BeanIter<'_, T> {
	/// Like [`Iterator::next`], but reports exhaustion as an error.
	pub fn try_next(&mut self) -> Result<BeanEntry<T>, LocatorError> {
		self.next().ok_or(LocatorError::NoSuchElement)
	}
}

impl<T: ?Sized + Contract> Iterator for BeanIter<'_, T> {
	type Item = BeanEntry<T>;

	fn next(&mut self) -> Option<BeanEntry<T>> {
		let beans = self.beans;
		loop {
			let binding = self.bindings.next()?;
			if let Some(entry) = self.memo.get(&binding.id()) {
				return Some(entry.clone());
			}
			if let Some(qualifier) = beans.strategy.qualifies(beans.key.qualifier(), &*binding) {
				let rank = self.bindings.rank().unwrap_or_default();
				return Some(beans.cache.create(qualifier, binding, rank));
			}
		}
	}
}
