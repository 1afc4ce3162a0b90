//! Collection-shaped views over [`LocatedBeans`].

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::beans::{BeanEntry, BeanIter, LocatedBeans};
use crate::error::ProvisionError;
use crate::key::{Contract, Qualifier};

/// Iterator over the instances of a located view, provisioning as it goes.
pub struct EntryValues<'a, T: ?Sized + Contract> {
	entries: BeanIter<'a, T>,
}

impl<T: ?Sized + Contract> Iterator for EntryValues<'_, T> {
	type Item = Result<Arc<T>, ProvisionError>;

	fn next(&mut self) -> Option<Self::Item> {
		self.entries.next().map(|entry| entry.value())
	}
}

/// Qualifier-keyed lookup over a located view; the highest ranked entry wins a qualifier.
pub struct EntryMap<'a, T: ?Sized + Contract> {
	beans: &'a LocatedBeans<T>,
}

impl<T: ?Sized + Contract> EntryMap<'_, T> {
	pub fn get(&self, qualifier: &Qualifier) -> Option<BeanEntry<T>> {
		self.beans.iter().find(|entry| entry.key() == qualifier)
	}

	pub fn contains_key(&self, qualifier: &Qualifier) -> bool {
		self.get(qualifier).is_some()
	}

	/// Current `(qualifier, entry)` pairs in rank order.
	pub fn snapshot(&self) -> IndexMap<Qualifier, BeanEntry<T>, FxBuildHasher> {
		let mut map = IndexMap::default();
		for entry in self.beans.iter() {
			map.entry(entry.key().clone()).or_insert(entry);
		}
		map
	}

	pub fn keys(&self) -> Vec<Qualifier> {
		self.snapshot().into_keys().collect()
	}
}

impl<T: ?Sized + Contract> LocatedBeans<T> {
	/// Instances of the matching beans in rank order.
	pub fn values(&self) -> EntryValues<'_, T> {
		EntryValues { entries: self.iter() }
	}

	pub fn as_map(&self) -> EntryMap<'_, T> {
		EntryMap { beans: self }
	}
}

#[cfg(test)]
mod tests;
