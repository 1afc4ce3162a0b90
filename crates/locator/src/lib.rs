//! Ranked, qualified bean location over dynamically registered binding sources.
//!
//! # Purpose
//!
//! A [`BeanLocator`] presents a live, rank-ordered and deduplicated view of every bean that
//! matches a [`Key`] across a changing set of sources, and notifies [`Mediator`]s as matching
//! beans come and go.
//!
//! # Mental Model
//!
//! ```text
//! Injector ──► InjectorPublisher ──► BeanLocator ──► RankedBindings<T> (one per contract, weak)
//!                 (ranking)              │                 │ lazy pull
//!                                        │                 ▼
//!                                        │           LocatedBeans<T> ──► BeanEntry<T>
//!                                        └──► WatchedBeans<T, W> ──► Mediator<T, W>
//! ```
//!
//! Adding a source imports nothing. Each cached contract marks it pending, and iteration pulls
//! a pending source only when it could contribute the next element in rank order. Qualification
//! and provisioning are equally lazy: an entry is created when iteration reaches its binding and
//! its value is provisioned when first asked for.
//!
//! # Ranking
//!
//! Sources registered through [`BeanLocator::add_injector`] use a [`DefaultRankingFunction`]:
//! unqualified bindings rank at the source's rank, qualified ones rank below every unqualified
//! binding. Ties keep registration order.

mod adapters;
mod beans;
mod binding;
mod config;
mod error;
mod hints;
mod key;
mod locator;
mod qualify;
mod ranked_bindings;
mod source;
mod watch;

pub use adapters::{EntryMap, EntryValues};
pub use beans::{BeanEntry, BeanIter, LocatedBeans};
pub use bindery_ranked::Rank;
pub use binding::{AnyBinding, Binding, BindingId, BindingInfo, BindingKind, Factory, Implementation, Scope};
pub use config::LocatorConfig;
pub use error::{BoxError, LocatorError, ProvisionError};
pub use hints::{HintedBeans, HintedEntry};
pub use key::{Contract, Key, Marker, Qualifier, QualifierRequest, TypeKey};
pub use locator::BeanLocator;
pub use qualify::QualifyingStrategy;
pub use source::{
	BindingBuilder, BindingPublisher, BindingSubscriber, DefaultRankingFunction, Injector, InjectorBuilder,
	InjectorPublisher, RankingFunction, SourceId,
};
pub use watch::Mediator;

#[cfg(test)]
mod test_helpers;
