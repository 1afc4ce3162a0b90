//! The locator facade.
//!
//! # Purpose
//!
//! - Owns the registered sources, ordered by their maximum binding rank.
//! - Keeps one weakly held `RankedBindings` per located contract and the list of live watches.
//! - Routes source additions and removals to both.
//!
//! # Mental Model
//!
//! Nothing is imported when a source is added. The source only becomes pending in every cached
//! contract and is offered to every watch. Located views pull from pending sources as they
//! iterate. Views and watchers are held weakly; dead ones are swept on the next mutation.
//!
//! # Invariants
//!
//! - A source is registered at most once; adding it again or removing an absent one is a no-op.
//!   - Enforced in: `BeanLocator::add`, `BeanLocator::remove_source`
//!   - Tested by: `locator::tests::re_adding_a_source_is_a_no_op`
//! - Facade operations are serialized; mediators may call back into the locator.
//!   - Enforced in: `BeanLocator::serial`
//!   - Tested by: `locator::tests::mediators_can_reenter_the_locator`

use std::any::TypeId;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Weak};

use bindery_ranked::{Rank, RankedSequence, uid};
use parking_lot::{Mutex, ReentrantMutex};
use rustc_hash::FxHashMap;

use crate::beans::LocatedBeans;
use crate::config::LocatorConfig;
use crate::hints::HintedBeans;
use crate::key::{Contract, Key};
use crate::ranked_bindings::{PublisherSink, RankedBindings, SourceTiers};
use crate::source::{BindingPublisher, Injector, InjectorPublisher, SourceId};
use crate::watch::{Mediator, WatchSink, WatchedBeans};

/// Dynamic, multi-source bean locator.
pub struct BeanLocator {
	serial: ReentrantMutex<()>,
	publishers: RankedSequence<Arc<dyn BindingPublisher>>,
	tiers: Arc<SourceTiers>,
	registrations: AtomicU32,
	cached: Mutex<FxHashMap<TypeId, Weak<dyn PublisherSink>>>,
	watches: Mutex<Vec<Arc<dyn WatchSink>>>,
	config: LocatorConfig,
}

impl Default for BeanLocator {
	fn default() -> Self {
		Self::new()
	}
}

impl BeanLocator {
	pub fn new() -> Self {
		Self::with_config(LocatorConfig::default())
	}

	pub fn with_config(config: LocatorConfig) -> Self {
		Self {
			serial: ReentrantMutex::new(()),
			publishers: RankedSequence::new(),
			tiers: Arc::default(),
			registrations: AtomicU32::new(0),
			cached: Mutex::new(FxHashMap::default()),
			watches: Mutex::new(Vec::new()),
			config,
		}
	}

	pub fn config(&self) -> &LocatorConfig {
		&self.config
	}

	/// Registers a source; returns `false` if a source with the same id is already present.
	pub fn add(&self, publisher: Arc<dyn BindingPublisher>) -> bool {
		let _serial = self.serial.lock();
		let source = publisher.source_id();
		if self.publishers.contains_where(|p| p.source_id() == source) {
			tracing::debug!(%source, "source already registered");
			return false;
		}
		let rank = publisher.max_binding_rank();
		let ordinal = self.registrations.fetch_add(1, Ordering::Relaxed);
		self.tiers.assign(source, uid::tier(rank, ordinal));
		self.publishers.insert(Arc::clone(&publisher), rank);
		for sink in self.live_sinks() {
			sink.add_publisher(Arc::clone(&publisher), rank);
		}
		for watch in self.live_watches() {
			publisher.subscribe(&*watch);
		}
		tracing::debug!(%source, rank, "source added");
		true
	}

	/// Registers `injector` ranked by a default ranking function at `rank`.
	pub fn add_injector(&self, injector: &Arc<Injector>, rank: Rank) -> bool {
		self.add(Arc::new(InjectorPublisher::ranked(Arc::clone(injector), rank)))
	}

	/// Registers `injector` at the configured default rank.
	pub fn add_injector_default(&self, injector: &Arc<Injector>) -> bool {
		self.add_injector(injector, self.config.default_rank)
	}

	/// Unregisters the source `publisher` stands for; returns `false` if it was not registered.
	pub fn remove(&self, publisher: &dyn BindingPublisher) -> bool {
		self.remove_source(publisher.source_id())
	}

	pub fn remove_injector(&self, injector: &Injector) -> bool {
		self.remove_source(injector.id())
	}

	pub fn remove_source(&self, source: SourceId) -> bool {
		let _serial = self.serial.lock();
		let Some(publisher) = self.publishers.find(|p| p.source_id() == source) else {
			tracing::debug!(%source, "source not registered");
			return false;
		};
		self.publishers.remove_this(&publisher);
		for sink in self.live_sinks() {
			sink.remove_publisher(&publisher);
		}
		for watch in self.live_watches() {
			publisher.unsubscribe(&*watch);
		}
		self.tiers.forget(source);
		tracing::debug!(%source, "source removed");
		true
	}

	/// Unregisters every source; watches receive removals for everything they tracked.
	pub fn clear(&self) {
		let _serial = self.serial.lock();
		let removed = self.publishers.len();
		self.publishers.clear();
		for sink in self.live_sinks() {
			sink.clear();
		}
		for watch in self.live_watches() {
			watch.clear();
		}
		self.tiers.clear();
		tracing::debug!(removed, "sources cleared");
	}

	/// Registered sources in rank order.
	pub fn publishers(&self) -> Vec<Arc<dyn BindingPublisher>> {
		self.publishers.snapshot()
	}

	/// Returns a live view of the beans matching `key`.
	pub fn locate<T: ?Sized + Contract>(&self, key: Key<T>) -> LocatedBeans<T> {
		let _serial = self.serial.lock();
		LocatedBeans::new(key, self.ranked_bindings::<T>())
	}

	/// Looks up beans of `T` by name hints; see [`HintedBeans`].
	pub fn locate_hinted<T: ?Sized + Contract, S: AsRef<str>>(&self, hints: &[S]) -> HintedBeans<T> {
		HintedBeans::new(self.locate(Key::any()), hints)
	}

	/// Watches beans matching `key`, replaying the ones already available.
	///
	/// Returns the already registered watcher when `watcher` is watching `key` already, in which
	/// case `mediator` is dropped; returns `None` once a new watch is in place.
	pub fn watch<T, W, M>(&self, key: Key<T>, mediator: M, watcher: &Arc<W>) -> Option<Arc<W>>
	where
		T: ?Sized + Contract,
		W: ?Sized + Send + Sync + 'static,
		M: Mediator<T, W>,
	{
		let _serial = self.serial.lock();
		for watch in self.live_watches() {
			if let Some(existing) = watch.as_any().downcast_ref::<WatchedBeans<T, W>>()
				&& let Some(current) = existing.same_registration(&key, watcher)
			{
				tracing::debug!(?key, "watch already registered");
				return Some(current);
			}
		}
		let watched = Arc::new(WatchedBeans::new(key, mediator, watcher, self.config.catch_mediator_panics));
		for publisher in self.publishers.snapshot() {
			publisher.subscribe(&*watched);
		}
		tracing::debug!(watch = ?watched, "watch registered");
		self.watches.lock().push(watched);
		None
	}

	/// Number of contracts whose bindings are still used by some located view.
	pub fn cached_types(&self) -> usize {
		let mut cached = self.cached.lock();
		cached.retain(|_, sink| sink.strong_count() > 0);
		cached.len()
	}

	/// Number of watches whose watcher is still alive.
	pub fn active_watches(&self) -> usize {
		let mut watches = self.watches.lock();
		watches.retain(|watch| !watch.is_inactive());
		watches.len()
	}

	fn ranked_bindings<T: ?Sized + Contract>(&self) -> Arc<RankedBindings<T>> {
		let mut cached = self.cached.lock();
		let contract = TypeId::of::<T>();
		if let Some(sink) = cached.get(&contract).and_then(Weak::upgrade)
			&& let Ok(bindings) = sink.into_any().downcast::<RankedBindings<T>>()
		{
			return bindings;
		}
		let bindings = Arc::new(RankedBindings::<T>::new(&self.publishers, Arc::clone(&self.tiers)));
		let sink: Arc<dyn PublisherSink> = bindings.clone();
		cached.insert(contract, Arc::downgrade(&sink));
		bindings
	}

	fn live_sinks(&self) -> Vec<Arc<dyn PublisherSink>> {
		let mut cached = self.cached.lock();
		let mut live = Vec::with_capacity(cached.len());
		cached.retain(|_, sink| match sink.upgrade() {
			Some(sink) => {
				live.push(sink);
				true
			}
			None => false,
		});
		live
	}

	fn live_watches(&self) -> Vec<Arc<dyn WatchSink>> {
		let mut watches = self.watches.lock();
		let before = watches.len();
		watches.retain(|watch| !watch.is_inactive());
		if watches.len() < before {
			tracing::trace!(pruned = before - watches.len(), "pruned inactive watches");
		}
		watches.clone()
	}
}

impl fmt::Debug for BeanLocator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("BeanLocator")
			.field("publishers", &self.publishers.len())
			.field("cached", &self.cached.lock().len())
			.field("watches", &self.watches.lock().len())
			.field("config", &self.config)
			.finish()
	}
}

#[cfg(test)]
mod tests;
