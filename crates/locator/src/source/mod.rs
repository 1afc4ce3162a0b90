//! Binding sources and the publish/subscribe contract between sources and consumers.
//!
//! # Mental Model
//!
//! A source never pushes bindings on its own. Consumers ([`BindingSubscriber`]) ask a
//! [`BindingPublisher`] to `subscribe` them, at which point the publisher hands over every
//! visible binding of the consumer's contract together with its rank. `unsubscribe` is the
//! mirror image: the publisher retracts whatever the consumer still holds from it.
//!
//! # Invariants
//!
//! - Two publishers are the same source iff their [`SourceId`]s are equal.
//!   - Enforced in: `BeanLocator::add`, `RankedBindings::remove_publisher`
//!   - Tested by: `locator::tests::re_adding_a_source_is_a_no_op`
//! - Hidden bindings never reach a subscriber.
//!   - Enforced in: `InjectorPublisher::subscribe`
//!   - Tested by: `source::tests::hidden_bindings_are_not_published`

mod injector;
mod publisher;
mod ranking;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use bindery_ranked::Rank;
pub use injector::{BindingBuilder, Injector, InjectorBuilder};
pub use publisher::InjectorPublisher;
pub use ranking::{DefaultRankingFunction, RankingFunction};

use crate::binding::AnyBinding;
use crate::key::TypeKey;

static NEXT_SOURCE: AtomicU64 = AtomicU64::new(1);

/// Identity of one origin of bindings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(u64);

impl SourceId {
	pub(crate) fn next() -> Self {
		Self(NEXT_SOURCE.fetch_add(1, Ordering::Relaxed))
	}
}

impl fmt::Display for SourceId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "source#{}", self.0)
	}
}

/// Consumer of bindings for a single contract.
pub trait BindingSubscriber: Send + Sync {
	/// Contract this subscriber collects.
	fn contract(&self) -> TypeKey;

	/// Receives a binding at the rank its source assigned.
	fn add(&self, binding: AnyBinding, rank: Rank);

	/// Withdraws a binding previously passed to [`BindingSubscriber::add`].
	fn remove(&self, binding: &AnyBinding);

	/// Bindings currently held.
	fn bindings(&self) -> Vec<AnyBinding>;
}

/// One registered origin of bindings.
pub trait BindingPublisher: Send + Sync + 'static {
	fn source_id(&self) -> SourceId;

	/// Upper bound on the rank of any binding this publisher can produce.
	fn max_binding_rank(&self) -> Rank;

	/// Publishes every visible binding of `subscriber.contract()`.
	fn subscribe(&self, subscriber: &dyn BindingSubscriber);

	/// Retracts every binding the subscriber holds from this source.
	fn unsubscribe(&self, subscriber: &dyn BindingSubscriber) {
		let source = self.source_id();
		for binding in subscriber.bindings() {
			if binding.source_id() == source {
				subscriber.remove(&binding);
			}
		}
	}
}
