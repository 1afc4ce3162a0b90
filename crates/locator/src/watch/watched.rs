use std::any::{Any, type_name};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};

use bindery_ranked::Rank;
use indexmap::IndexMap;
use parking_lot::Mutex;
use rustc_hash::FxBuildHasher;

use super::Mediator;
use crate::beans::BeanEntry;
use crate::binding::{AnyBinding, BindingId};
use crate::error::BoxError;
use crate::key::{Contract, Key, TypeKey};
use crate::qualify::QualifyingStrategy;
use crate::source::BindingSubscriber;

/// What the locator needs from a watch without knowing its contract or watcher type.
pub(crate) trait WatchSink: BindingSubscriber {
	fn is_inactive(&self) -> bool;

	/// Withdraws every tracked entry, invoking the mediator's `remove` for each.
	fn clear(&self);

	fn as_any(&self) -> &dyn Any;
}

/// One watch registration: a request, its mediator and the weakly held watcher.
pub(crate) struct WatchedBeans<T: ?Sized + Contract, W: ?Sized + Send + Sync + 'static> {
	key: Key<T>,
	strategy: QualifyingStrategy,
	mediator: Arc<dyn Mediator<T, W>>,
	mediator_name: &'static str,
	watcher: Weak<W>,
	entries: Mutex<IndexMap<BindingId, BeanEntry<T>, FxBuildHasher>>,
	catch_panics: bool,
}

impl<T: ?Sized + Contract, W: ?Sized + Send + Sync + 'static> WatchedBeans<T, W> {
	pub(crate) fn new<M: Mediator<T, W>>(key: Key<T>, mediator: M, watcher: &Arc<W>, catch_panics: bool) -> Self {
		Self {
			strategy: QualifyingStrategy::select_for(key.qualifier()),
			key,
			mediator: Arc::new(mediator),
			mediator_name: type_name::<M>(),
			watcher: Arc::downgrade(watcher),
			entries: Mutex::new(IndexMap::default()),
			catch_panics,
		}
	}

	/// Returns the live watcher when this registration is for `key` and `watcher`.
	pub(crate) fn same_registration(&self, key: &Key<T>, watcher: &Arc<W>) -> Option<Arc<W>> {
		if self.key != *key || !Weak::ptr_eq(&self.watcher, &Arc::downgrade(watcher)) {
			return None;
		}
		self.watcher.upgrade()
	}

	/// Number of entries currently delivered to the mediator.
	pub(crate) fn len(&self) -> usize {
		self.entries.lock().len()
	}

	fn deliver(&self, event: Event, entry: &BeanEntry<T>, watcher: &W) {
		let call = || match event {
			Event::Add => self.mediator.add(entry, watcher),
			Event::Remove => self.mediator.remove(entry, watcher),
		};
		let outcome: Result<(), BoxError> = if self.catch_panics {
			match panic::catch_unwind(AssertUnwindSafe(call)) {
				Ok(outcome) => outcome,
				Err(payload) => {
					tracing::warn!(
						mediator = self.mediator_name,
						watcher = type_name::<W>(),
						event = event.as_str(),
						key = ?entry.key(),
						panic = panic_message(payload.as_ref()),
						"mediator panicked"
					);
					return;
				}
			}
		} else {
			call()
		};
		if let Err(error) = outcome {
			tracing::warn!(
				mediator = self.mediator_name,
				watcher = type_name::<W>(),
				event = event.as_str(),
				key = ?entry.key(),
				%error,
				"mediator failed"
			);
		}
	}
}

#[derive(Clone, Copy)]
enum Event {
	Add,
	Remove,
}

impl Event {
	fn as_str(self) -> &'static str {
		match self {
			Self::Add => "add",
			Self::Remove => "remove",
		}
	}
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
	if let Some(message) = payload.downcast_ref::<&'static str>() {
		message
	} else if let Some(message) = payload.downcast_ref::<String>() {
		message
	} else {
		"<non-string panic payload>"
	}
}

impl<T: ?Sized + Contract, W: ?Sized + Send + Sync + 'static> BindingSubscriber for WatchedBeans<T, W> {
	fn contract(&self) -> TypeKey {
		TypeKey::of::<T>()
	}

	fn add(&self, binding: AnyBinding, rank: Rank) {
		let Some(qualifier) = self.strategy.qualifies(self.key.qualifier(), &*binding) else {
			return;
		};
		let Some(watcher) = self.watcher.upgrade() else {
			return;
		};
		let Some(binding) = binding.downcast::<T>() else {
			return;
		};
		let entry = {
			let mut entries = self.entries.lock();
			if entries.contains_key(&binding.id()) {
				return;
			}
			let entry = BeanEntry::new(qualifier, binding, rank);
			entries.insert(entry.binding().id(), entry.clone());
			entry
		};
		self.deliver(Event::Add, &entry, &watcher);
	}

	fn remove(&self, binding: &AnyBinding) {
		let Some(entry) = self.entries.lock().shift_remove(&binding.id()) else {
			return;
		};
		if let Some(watcher) = self.watcher.upgrade() {
			self.deliver(Event::Remove, &entry, &watcher);
		}
	}

	fn bindings(&self) -> Vec<AnyBinding> {
		self.entries
			.lock()
			.values()
			.map(|entry| AnyBinding::from(Arc::clone(entry.binding())))
			.collect()
	}
}

impl<T: ?Sized + Contract, W: ?Sized + Send + Sync + 'static> WatchSink for WatchedBeans<T, W> {
	fn is_inactive(&self) -> bool {
		self.watcher.strong_count() == 0
	}

	fn clear(&self) {
		let entries = std::mem::take(&mut *self.entries.lock());
		let Some(watcher) = self.watcher.upgrade() else {
			return;
		};
		for entry in entries.values() {
			self.deliver(Event::Remove, entry, &watcher);
		}
	}

	fn as_any(&self) -> &dyn Any {
		self
	}
}

impl<T: ?Sized + Contract, W: ?Sized + Send + Sync + 'static> fmt::Debug for WatchedBeans<T, W> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("WatchedBeans")
			.field("key", &self.key)
			.field("mediator", &self.mediator_name)
			.field("watcher", &type_name::<W>())
			.field("entries", &self.len())
			.finish()
	}
}
