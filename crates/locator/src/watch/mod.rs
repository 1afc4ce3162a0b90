//! Watches: add/remove callbacks for matching beans as sources come and go.
//!
//! # Mental Model
//!
//! A watch is a [`BindingSubscriber`](crate::source::BindingSubscriber) that every registered
//! publisher feeds, including the ones registered before the watch existed. Each accepted
//! binding becomes a [`BeanEntry`](crate::beans::BeanEntry) stored by binding identity and
//! handed to the [`Mediator`] together with the watcher.
//!
//! The watcher is held weakly. Once it is dropped the watch delivers nothing further and the
//! locator discards it on its next mutation.
//!
//! # Invariants
//!
//! - `remove` is called with the very entry `add` received for the same binding.
//!   - Enforced in: `WatchedBeans::remove`
//!   - Tested by: `watch::tests::removals_pair_with_additions`
//! - A failing or panicking mediator never interrupts delivery to other bindings.
//!   - Enforced in: `WatchedBeans::deliver`
//!   - Tested by: `watch::tests::mediator_failures_are_contained`

mod watched;

pub(crate) use watched::{WatchSink, WatchedBeans};

use crate::beans::BeanEntry;
use crate::error::BoxError;
use crate::key::Contract;

/// Callbacks invoked as matching beans appear and disappear.
pub trait Mediator<T: ?Sized + Contract, W: ?Sized>: Send + Sync + 'static {
	fn add(&self, entry: &BeanEntry<T>, watcher: &W) -> Result<(), BoxError>;

	fn remove(&self, entry: &BeanEntry<T>, watcher: &W) -> Result<(), BoxError>;
}
