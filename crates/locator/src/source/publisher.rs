use std::fmt;
use std::sync::Arc;

use bindery_ranked::Rank;

use super::{BindingPublisher, BindingSubscriber, DefaultRankingFunction, Injector, RankingFunction, SourceId};

/// Publishes the bindings of one [`Injector`], ranked by a [`RankingFunction`].
pub struct InjectorPublisher {
	injector: Arc<Injector>,
	ranking: Arc<dyn RankingFunction>,
}

impl InjectorPublisher {
	pub fn new(injector: Arc<Injector>, ranking: Arc<dyn RankingFunction>) -> Self {
		Self { injector, ranking }
	}

	/// Publisher ranking `injector` with a [`DefaultRankingFunction`] at `rank`.
	pub fn ranked(injector: Arc<Injector>, rank: Rank) -> Self {
		Self::new(injector, Arc::new(DefaultRankingFunction::new(rank)))
	}

	pub fn injector(&self) -> &Arc<Injector> {
		&self.injector
	}
}

impl BindingPublisher for InjectorPublisher {
	fn source_id(&self) -> SourceId {
		self.injector.id()
	}

	fn max_binding_rank(&self) -> Rank {
		self.ranking.max_rank()
	}

	fn subscribe(&self, subscriber: &dyn BindingSubscriber) {
		let contract = subscriber.contract();
		let mut candidates = self.injector.bindings_of(contract);
		if candidates.is_empty() {
			candidates = self.injector.assignable_to(contract);
		}
		let mut published = 0usize;
		for binding in candidates.iter().filter(|b| !b.is_hidden()) {
			let rank = self.ranking.rank(&**binding);
			tracing::trace!(binding = %binding.id(), %contract, rank, "publishing binding");
			subscriber.add(binding.clone(), rank);
			published += 1;
		}
		tracing::debug!(source = %self.source_id(), injector = %self.injector.name(), %contract, published, "subscribed");
	}
}

impl PartialEq for InjectorPublisher {
	fn eq(&self, other: &Self) -> bool {
		self.source_id() == other.source_id()
	}
}

impl Eq for InjectorPublisher {}

impl std::hash::Hash for InjectorPublisher {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.source_id().hash(state);
	}
}

impl fmt::Debug for InjectorPublisher {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("InjectorPublisher")
			.field("injector", &self.injector)
			.field("max_binding_rank", &self.max_binding_rank())
			.finish()
	}
}
