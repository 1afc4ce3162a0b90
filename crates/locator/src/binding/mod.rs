//! Bindings: how a contract is produced, where it came from, and how it is qualified.
//!
//! # Role
//!
//! A [`Binding`] is immutable once its source creates it and is compared by [`BindingId`], never
//! structurally. [`AnyBinding`] is the type-erased handle sources and subscribers exchange;
//! typed consumers recover the [`Binding`] with [`AnyBinding::downcast`].
//!
//! Binding kinds form a closed set ([`BindingKind`]). The only question the locator asks of a kind
//! is which [`Implementation`] backs it, if that is statically known.

mod any;
mod memo;

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

pub use any::{AnyBinding, BindingInfo};
pub(crate) use memo::Memo;

use crate::error::{BoxError, ProvisionError};
use crate::key::{Contract, Marker, Qualifier, TypeKey};
use crate::source::SourceId;

static NEXT_BINDING: AtomicU64 = AtomicU64::new(1);

/// Process-unique binding identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(u64);

impl BindingId {
	pub(crate) fn next() -> Self {
		Self(NEXT_BINDING.fetch_add(1, Ordering::Relaxed))
	}

	pub fn get(self) -> u64 {
		self.0
	}
}

impl fmt::Display for BindingId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// Instance caching declared by the binding itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Scope {
	/// Every provision runs the factory.
	#[default]
	Unscoped,
	/// The binding provisions at most once.
	Singleton,
}

/// Statically known implementation behind a binding.
#[derive(Clone, Debug)]
pub struct Implementation {
	ty: TypeKey,
	markers: Vec<Marker>,
	description: Option<Arc<str>>,
}

impl Implementation {
	pub fn of<I: ?Sized + 'static>() -> Self {
		Self {
			ty: TypeKey::of::<I>(),
			markers: Vec::new(),
			description: None,
		}
	}

	/// Adds an implementation-level marker qualifier.
	pub fn marked(mut self, marker: Marker) -> Self {
		self.markers.push(marker);
		self
	}

	pub fn described(mut self, description: impl Into<Arc<str>>) -> Self {
		self.description = Some(description.into());
		self
	}

	pub fn ty(&self) -> TypeKey {
		self.ty
	}

	pub fn markers(&self) -> &[Marker] {
		&self.markers
	}

	/// Returns the first marker of type `kind` carried by the implementation.
	pub fn marker_of(&self, kind: TypeKey) -> Option<&Marker> {
		self.markers.iter().find(|m| m.kind() == kind)
	}

	pub fn description(&self) -> Option<&str> {
		self.description.as_deref()
	}
}

/// Factory producing instances of `T`.
pub type Factory<T> = Arc<dyn Fn() -> Result<Arc<T>, BoxError> + Send + Sync>;

/// How a binding produces its instance.
pub enum BindingKind<T: ?Sized + Contract> {
	/// A pre-built instance.
	Instance {
		value: Arc<T>,
		implementation: Option<Implementation>,
	},
	/// A known implementation built by a factory.
	Constructor {
		implementation: Implementation,
		factory: Factory<T>,
	},
	/// An opaque factory.
	Provider(Factory<T>),
	/// Delegates to another binding of the same contract.
	Linked(Arc<Binding<T>>),
	/// Re-exports a binding from a private module.
	Exposed(Arc<Binding<T>>),
}

impl<T: ?Sized + Contract> BindingKind<T> {
	pub fn label(&self) -> &'static str {
		match self {
			Self::Instance { .. } => "instance",
			Self::Constructor { .. } => "constructor",
			Self::Provider(_) => "provider",
			Self::Linked(_) => "linked",
			Self::Exposed(_) => "exposed",
		}
	}
}

/// Association between contract `T` and a way to produce it.
pub struct Binding<T: ?Sized + Contract> {
	pub(crate) id: BindingId,
	pub(crate) contract: TypeKey,
	pub(crate) qualifier: Option<Qualifier>,
	pub(crate) kind: BindingKind<T>,
	pub(crate) scope: Scope,
	pub(crate) source: SourceId,
	pub(crate) origin: Arc<str>,
	pub(crate) hidden: bool,
	pub(crate) singleton: Memo<T>,
}

impl<T: ?Sized + Contract> Binding<T> {
	pub fn id(&self) -> BindingId {
		self.id
	}

	pub fn contract(&self) -> TypeKey {
		self.contract
	}

	/// Declared qualifier; `None` for the unqualified (default) binding.
	pub fn qualifier(&self) -> Option<&Qualifier> {
		self.qualifier.as_ref()
	}

	pub fn kind(&self) -> &BindingKind<T> {
		&self.kind
	}

	pub fn scope(&self) -> Scope {
		self.scope
	}

	pub fn source_id(&self) -> SourceId {
		self.source
	}

	/// Human-readable description of where the binding was declared.
	pub fn origin(&self) -> &str {
		&self.origin
	}

	pub fn is_hidden(&self) -> bool {
		self.hidden
	}

	/// Returns `true` when provisioning is already known to happen at most once.
	pub fn is_singleton(&self) -> bool {
		if self.scope == Scope::Singleton {
			return true;
		}
		match &self.kind {
			BindingKind::Instance { .. } => true,
			BindingKind::Linked(target) | BindingKind::Exposed(target) => target.is_singleton(),
			BindingKind::Constructor { .. } | BindingKind::Provider(_) => false,
		}
	}

	/// Resolves the backing implementation, following links and exports.
	pub fn implementation(&self) -> Option<&Implementation> {
		match &self.kind {
			BindingKind::Instance { implementation, .. } => implementation.as_ref(),
			BindingKind::Constructor { implementation, .. } => Some(implementation),
			BindingKind::Provider(_) => None,
			BindingKind::Linked(target) | BindingKind::Exposed(target) => target.implementation(),
		}
	}

	/// Produces an instance, honoring the binding's own [`Scope`].
	pub fn provide(&self) -> Result<Arc<T>, ProvisionError> {
		match self.scope {
			Scope::Singleton => self.singleton.get_or_try_init(|| self.instantiate()),
			Scope::Unscoped => self.instantiate(),
		}
	}

	fn instantiate(&self) -> Result<Arc<T>, ProvisionError> {
		match &self.kind {
			BindingKind::Instance { value, .. } => Ok(Arc::clone(value)),
			BindingKind::Constructor { factory, .. } | BindingKind::Provider(factory) => {
				factory().map_err(|error| ProvisionError {
					binding: self.id,
					contract: self.contract.name(),
					origin: Arc::clone(&self.origin),
					reason: error.to_string().into(),
				})
			}
			BindingKind::Linked(target) | BindingKind::Exposed(target) => target.provide(),
		}
	}
}

impl<T: ?Sized + Contract> fmt::Debug for Binding<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Binding")
			.field("id", &self.id)
			.field("contract", &self.contract)
			.field("qualifier", &self.qualifier)
			.field("kind", &self.kind.label())
			.field("scope", &self.scope)
			.field("origin", &self.origin)
			.finish()
	}
}
