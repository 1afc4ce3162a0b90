use std::any::Any;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use super::{Binding, BindingId, Implementation, Scope};
use crate::key::{Contract, Qualifier, TypeKey};
use crate::source::SourceId;

/// Contract-independent view of a binding.
///
/// Everything the ranking and qualifying layers need without knowing `T`.
pub trait BindingInfo: Send + Sync + 'static {
	fn id(&self) -> BindingId;
	fn contract(&self) -> TypeKey;
	fn qualifier(&self) -> Option<&Qualifier>;
	fn source_id(&self) -> SourceId;
	fn origin(&self) -> &str;
	fn is_hidden(&self) -> bool;
	fn scope(&self) -> Scope;
	fn implementation(&self) -> Option<&Implementation>;
	fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: ?Sized + Contract> BindingInfo for Binding<T> {
	fn id(&self) -> BindingId {
		self.id
	}

	fn contract(&self) -> TypeKey {
		self.contract
	}

	fn qualifier(&self) -> Option<&Qualifier> {
		self.qualifier.as_ref()
	}

	fn source_id(&self) -> SourceId {
		self.source
	}

	fn origin(&self) -> &str {
		&self.origin
	}

	fn is_hidden(&self) -> bool {
		self.hidden
	}

	fn scope(&self) -> Scope {
		self.scope
	}

	fn implementation(&self) -> Option<&Implementation> {
		Binding::implementation(self)
	}

	fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
		self
	}
}

/// Type-erased shared handle to a [`Binding`].
#[derive(Clone)]
pub struct AnyBinding(Arc<dyn BindingInfo>);

impl AnyBinding {
	/// Recovers the typed binding when the contract is `T`.
	pub fn downcast<T: ?Sized + Contract>(&self) -> Option<Arc<Binding<T>>> {
		Arc::clone(&self.0).into_any().downcast::<Binding<T>>().ok()
	}

	/// Returns `true` when both handles refer to the same binding.
	pub fn same(&self, other: &AnyBinding) -> bool {
		self.0.id() == other.0.id()
	}
}

impl Deref for AnyBinding {
	type Target = dyn BindingInfo;

	fn deref(&self) -> &Self::Target {
		&*self.0
	}
}

impl<T: ?Sized + Contract> From<Arc<Binding<T>>> for AnyBinding {
	fn from(binding: Arc<Binding<T>>) -> Self {
		Self(binding)
	}
}

impl fmt::Debug for AnyBinding {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AnyBinding")
			.field("id", &self.0.id())
			.field("contract", &self.0.contract())
			.field("qualifier", &self.0.qualifier())
			.field("source", &self.0.source_id())
			.finish()
	}
}
