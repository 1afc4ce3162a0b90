//! Per-contract merge of every registered source into one rank-ordered binding sequence.
//!
//! # Purpose
//!
//! - Owns the bindings of one contract imported so far, plus the publishers not consulted yet.
//! - Imports lazily: a publisher is pulled only when it could contribute the next element.
//!
//! # Mental Model
//!
//! Publishers wait in `pending`, ordered by their maximum binding rank. An iterator about to
//! yield looks at the head of `pending`: if that publisher might produce something ranked at or
//! above the next imported binding (or nothing is imported ahead), it is subscribed and leaves
//! `pending`. Pulling repeats until the head cannot outrank what is already imported.
//!
//! Bindings of equal rank are ordered by the tier of their source, which the locator derives
//! from the source's maximum rank and registration order. Ties therefore never depend on when a
//! source happened to be pulled.
//!
//! # Invariants
//!
//! - A publisher is either pending or pulled, never both.
//!   - Enforced in: `RankedBindings::pull`, `RankedBindings::remove_publisher`
//!   - Tested by: `ranked_bindings::tests::removing_a_pending_publisher_never_pulls_it`
//! - Iteration order across publishers matches each binding's own rank.
//!   - Enforced in: `RankedIter::next`
//!   - Tested by: `ranked_bindings::tests::pull_is_lazy_and_order_is_global`
//! - Equal-rank bindings are ordered by source tier, independent of pull timing.
//!   - Enforced in: `RankedBindings::add`, `SourceTiers`
//!   - Tested by: `ranked_bindings::tests::equal_ranks_follow_source_tiers_not_pull_order`

use std::any::Any;
use std::sync::{Arc, Weak};

use bindery_ranked::{Cursor, Rank, RankedSequence};
use parking_lot::{Mutex, RwLock};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::beans::BeanCache;
use crate::binding::{AnyBinding, Binding, BindingId};
use crate::key::{Contract, TypeKey};
use crate::source::{BindingPublisher, BindingSubscriber, SourceId};

/// Type-erased handle the locator keeps in its per-contract cache.
pub(crate) trait PublisherSink: Send + Sync {
	fn add_publisher(&self, publisher: Arc<dyn BindingPublisher>, rank: Rank);
	fn remove_publisher(&self, publisher: &Arc<dyn BindingPublisher>);
	fn clear(&self);
	fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// Tie-break order of every registered source, shared by the locator and its contract caches.
#[derive(Default)]
pub(crate) struct SourceTiers(RwLock<FxHashMap<SourceId, u64>>);

impl SourceTiers {
	/// Tier used for bindings of sources the locator never registered.
	const UNREGISTERED: u64 = u64::MAX;

	pub(crate) fn assign(&self, source: SourceId, tier: u64) {
		self.0.write().insert(source, tier);
	}

	pub(crate) fn forget(&self, source: SourceId) {
		self.0.write().remove(&source);
	}

	pub(crate) fn clear(&self) {
		self.0.write().clear();
	}

	pub(crate) fn of(&self, source: SourceId) -> u64 {
		self.0.read().get(&source).copied().unwrap_or(Self::UNREGISTERED)
	}
}

pub(crate) struct RankedBindings<T: ?Sized + Contract> {
	bindings: RankedSequence<Arc<Binding<T>>>,
	tiers: Arc<SourceTiers>,
	pending: RankedSequence<Arc<dyn BindingPublisher>>,
	pull_lock: Mutex<()>,
	caches: Mutex<Vec<Weak<BeanCache<T>>>>,
}

impl<T: ?Sized + Contract> RankedBindings<T> {
	/// Starts with every publisher in `publishers` pending, keeping their relative order.
	pub(crate) fn new(publishers: &RankedSequence<Arc<dyn BindingPublisher>>, tiers: Arc<SourceTiers>) -> Self {
		Self {
			bindings: RankedSequence::new(),
			tiers,
			pending: RankedSequence::from_sequence(publishers),
			pull_lock: Mutex::new(()),
			caches: Mutex::new(Vec::new()),
		}
	}

	pub(crate) fn iter(&self) -> RankedIter<'_, T> {
		RankedIter {
			owner: self,
			cursor: self.bindings.iter(),
		}
	}

	/// Registers a bean cache to be told about retracted bindings.
	pub(crate) fn track(&self, cache: &Arc<BeanCache<T>>) {
		let mut caches = self.caches.lock();
		caches.retain(|c| c.strong_count() > 0);
		caches.push(Arc::downgrade(cache));
	}

	/// Identities of every imported binding.
	pub(crate) fn active_ids(&self) -> FxHashSet<BindingId> {
		self.bindings.snapshot().iter().map(|b| b.id()).collect()
	}

	/// Subscribes the head of `pending` while it could outrank or tie the cursor's next binding.
	fn pull(&self, cursor: &mut Cursor<'_, Arc<Binding<T>>>) {
		let Some(head) = self.pending.peek() else {
			return;
		};
		if outranks_pending(cursor, &*head) {
			return;
		}
		let _guard = self.pull_lock.lock();
		while let Some(head) = self.pending.peek() {
			if outranks_pending(cursor, &*head) {
				break;
			}
			tracing::debug!(source = %head.source_id(), contract = %TypeKey::of::<T>(), "pulling bindings");
			head.subscribe(self);
			self.pending.remove_this(&head);
		}
	}
}

impl<T: ?Sized + Contract> BindingSubscriber for RankedBindings<T> {
	fn contract(&self) -> TypeKey {
		TypeKey::of::<T>()
	}

	fn add(&self, binding: AnyBinding, rank: Rank) {
		match binding.downcast::<T>() {
			Some(binding) => {
				let tier = self.tiers.of(binding.source_id());
				self.bindings.insert_tiered(binding, rank, tier);
			}
			None => tracing::warn!(
				binding = %binding.id(),
				expected = %TypeKey::of::<T>(),
				actual = %binding.contract(),
				"ignoring binding of another contract"
			),
		}
	}

	fn remove(&self, binding: &AnyBinding) {
		let id = binding.id();
		if !self.bindings.remove_where(|b| b.id() == id) {
			return;
		}
		for cache in self.caches.lock().iter().filter_map(Weak::upgrade) {
			cache.remove(id);
		}
	}

	fn bindings(&self) -> Vec<AnyBinding> {
		self.bindings.snapshot().into_iter().map(AnyBinding::from).collect()
	}
}

impl<T: ?Sized + Contract> PublisherSink for RankedBindings<T> {
	fn add_publisher(&self, publisher: Arc<dyn BindingPublisher>, rank: Rank) {
		self.pending.insert(publisher, rank);
	}

	fn remove_publisher(&self, publisher: &Arc<dyn BindingPublisher>) {
		let source = publisher.source_id();
		let was_pending = {
			let _guard = self.pull_lock.lock();
			self.pending.remove_where(|p| p.source_id() == source)
		};
		if !was_pending {
			publisher.unsubscribe(self);
		}
	}

	fn clear(&self) {
		let _guard = self.pull_lock.lock();
		self.pending.clear();
		for binding in self.bindings.snapshot() {
			self.remove(&AnyBinding::from(binding));
		}
	}

	fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
		self
	}
}

/// Ties are pulled too, so the source tier rather than pull timing decides their order.
fn outranks_pending<T: ?Sized + Contract>(
	cursor: &mut Cursor<'_, Arc<Binding<T>>>,
	head: &dyn BindingPublisher,
) -> bool {
	let max = head.max_binding_rank();
	cursor.peek_rank().is_some_and(|next| next > max)
}

/// Live iterator over [`RankedBindings`], pulling pending publishers on demand.
pub(crate) struct RankedIter<'a, T: ?Sized + Contract> {
	owner: &'a RankedBindings<T>,
	cursor: Cursor<'a, Arc<Binding<T>>>,
}

impl<T: ?Sized + Contract> RankedIter<'_, T> {
	/// Rank of the binding most recently returned.
	pub(crate) fn rank(&self) -> Option<Rank> {
		self.cursor.rank()
	}
}

impl<T: ?Sized + Contract> Iterator for RankedIter<'_, T> {
	type Item = Arc<Binding<T>>;

	fn next(&mut self) -> Option<Self::Item> {
		self.owner.pull(&mut self.cursor);
		self.cursor.next()
	}
}
