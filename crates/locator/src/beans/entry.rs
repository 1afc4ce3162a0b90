use std::fmt;
use std::sync::Arc;

use bindery_ranked::Rank;

use crate::binding::{Binding, Implementation, Memo};
use crate::error::{LocatorError, ProvisionError};
use crate::key::{Contract, Qualifier};
use crate::source::SourceId;

struct EntryInner<T: ?Sized + Contract> {
	qualifier: Qualifier,
	binding: Arc<Binding<T>>,
	rank: Rank,
	value: Memo<T>,
}

/// Qualified, lazily provisioned view of one binding for one request.
///
/// Cloning is cheap and keeps identity: clones compare equal under [`BeanEntry::ptr_eq`].
pub struct BeanEntry<T: ?Sized + Contract>(Arc<EntryInner<T>>);

impl<T: ?Sized + Contract> BeanEntry<T> {
	pub(crate) fn new(qualifier: Qualifier, binding: Arc<Binding<T>>, rank: Rank) -> Self {
		Self(Arc::new(EntryInner {
			qualifier,
			binding,
			rank,
			value: Memo::default(),
		}))
	}

	/// Qualifier the entry was located under.
	pub fn key(&self) -> &Qualifier {
		&self.0.qualifier
	}

	/// Provisions the bean on first success and returns the same instance afterwards.
	pub fn value(&self) -> Result<Arc<T>, ProvisionError> {
		let binding = &self.0.binding;
		if binding.is_singleton() {
			return binding.provide();
		}
		self.0.value.get_or_try_init(|| binding.provide())
	}

	/// Returns the instance if it has already been provisioned through this entry.
	pub fn peek(&self) -> Option<Arc<T>> {
		self.0.value.get()
	}

	/// Entries are read-only views.
	pub fn set_value(&self, _value: Arc<T>) -> Result<Arc<T>, LocatorError> {
		Err(LocatorError::Unsupported("BeanEntry::set_value"))
	}

	/// Raw provider of the underlying binding, bypassing this entry's memo.
	pub fn provider(&self) -> impl Fn() -> Result<Arc<T>, ProvisionError> + Send + Sync + 'static {
		let binding = Arc::clone(&self.0.binding);
		move || binding.provide()
	}

	pub fn description(&self) -> Option<&str> {
		self.implementation().and_then(Implementation::description)
	}

	pub fn implementation(&self) -> Option<&Implementation> {
		self.0.binding.implementation()
	}

	/// Origin descriptor of the underlying binding.
	pub fn source(&self) -> &str {
		self.0.binding.origin()
	}

	pub fn source_id(&self) -> SourceId {
		self.0.binding.source_id()
	}

	pub fn rank(&self) -> Rank {
		self.0.rank
	}

	pub fn binding(&self) -> &Arc<Binding<T>> {
		&self.0.binding
	}

	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

impl<T: ?Sized + Contract> Clone for BeanEntry<T> {
	fn clone(&self) -> Self {
		Self(Arc::clone(&self.0))
	}
}

impl<T: ?Sized + Contract> fmt::Debug for BeanEntry<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("BeanEntry")
			.field("key", &self.0.qualifier)
			.field("binding", &self.0.binding.id())
			.field("rank", &self.0.rank)
			.field("source", &self.0.binding.origin())
			.field("provisioned", &self.0.value.get().is_some())
			.finish()
	}
}
