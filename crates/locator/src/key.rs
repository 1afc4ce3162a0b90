//! Contracts, qualifiers and request keys.

use std::any::TypeId;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;

/// Marker trait for types that can be bound and located.
///
/// Contracts are usually trait objects (`dyn Service`), but any `'static` thread-safe type works.
pub trait Contract: Send + Sync + 'static {}
impl<T> Contract for T where T: ?Sized + Send + Sync + 'static {}

/// Runtime identity of a contract or marker type.
#[derive(Clone, Copy)]
pub struct TypeKey {
	id: TypeId,
	name: &'static str,
}

impl TypeKey {
	pub fn of<T: ?Sized + 'static>() -> Self {
		Self {
			id: TypeId::of::<T>(),
			name: std::any::type_name::<T>(),
		}
	}

	pub fn id(&self) -> TypeId {
		self.id
	}

	pub fn name(&self) -> &'static str {
		self.name
	}
}

impl PartialEq for TypeKey {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.id.hash(state);
	}
}

impl fmt::Debug for TypeKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name)
	}
}

impl fmt::Display for TypeKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name)
	}
}

/// Marker-style qualifier: a marker type plus optional attributes.
///
/// Markers compare structurally, so two independently built markers of the same type with the
/// same attributes are equal.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Marker {
	kind: TypeKey,
	attributes: BTreeMap<Arc<str>, Arc<str>>,
}

impl Marker {
	/// Creates an attribute-less marker of type `M`.
	pub fn of<M: ?Sized + 'static>() -> Self {
		Self {
			kind: TypeKey::of::<M>(),
			attributes: BTreeMap::new(),
		}
	}

	/// Sets an attribute, replacing any previous value.
	pub fn with(mut self, name: impl Into<Arc<str>>, value: impl Into<Arc<str>>) -> Self {
		self.attributes.insert(name.into(), value.into());
		self
	}

	pub fn kind(&self) -> TypeKey {
		self.kind
	}

	pub fn attribute(&self, name: &str) -> Option<&str> {
		self.attributes.get(name).map(|v| &**v)
	}

	pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
		self.attributes.iter().map(|(k, v)| (&**k, &**v))
	}
}

impl fmt::Debug for Marker {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(self, f)
	}
}

impl fmt::Display for Marker {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "@{}", self.kind)?;
		if !self.attributes.is_empty() {
			f.write_str("(")?;
			for (i, (name, value)) in self.attributes.iter().enumerate() {
				if i > 0 {
					f.write_str(", ")?;
				}
				write!(f, "{name}={value:?}")?;
			}
			f.write_str(")")?;
		}
		Ok(())
	}
}

/// Qualifier exposed for a located bean.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Qualifier {
	/// Reserved sentinel for the unqualified binding of a contract.
	Default,
	/// Name-style qualifier.
	Named(Arc<str>),
	/// Marker-style qualifier.
	Marked(Marker),
}

impl Qualifier {
	/// Hint that selects [`Qualifier::Default`] in hint lookups.
	pub const DEFAULT_HINT: &'static str = "default";

	pub fn named(name: impl Into<Arc<str>>) -> Self {
		Self::Named(name.into())
	}

	pub fn is_default(&self) -> bool {
		matches!(self, Self::Default)
	}

	/// Returns the name of a [`Qualifier::Named`] qualifier.
	pub fn name(&self) -> Option<&str> {
		match self {
			Self::Named(name) => Some(&**name),
			_ => None,
		}
	}

	pub fn marker(&self) -> Option<&Marker> {
		match self {
			Self::Marked(marker) => Some(marker),
			_ => None,
		}
	}

	/// Returns `true` when a string hint selects this qualifier.
	///
	/// The hint `"default"` only ever selects [`Qualifier::Default`].
	pub fn matches_hint(&self, hint: &str) -> bool {
		match self {
			Self::Default => hint == Self::DEFAULT_HINT,
			Self::Named(name) => hint != Self::DEFAULT_HINT && &**name == hint,
			Self::Marked(_) => false,
		}
	}
}

impl From<Marker> for Qualifier {
	fn from(marker: Marker) -> Self {
		Self::Marked(marker)
	}
}

impl fmt::Debug for Qualifier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(self, f)
	}
}

impl fmt::Display for Qualifier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Default => f.write_str("@default"),
			Self::Named(name) => write!(f, "@named({name:?})"),
			Self::Marked(marker) => fmt::Display::fmt(marker, f),
		}
	}
}

/// Qualifier requirement of a request.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum QualifierRequest {
	/// Any binding, qualified or not.
	Any,
	/// Any name-qualified binding.
	AnyNamed,
	/// A binding with exactly this name.
	Named(Arc<str>),
	/// Any binding carrying a marker of this type.
	AnyMarked(TypeKey),
	/// A binding carrying exactly this marker.
	Marked(Marker),
}

/// Request for beans of contract `T` with a qualifier requirement.
pub struct Key<T: ?Sized> {
	contract: TypeKey,
	qualifier: QualifierRequest,
	_contract: PhantomData<fn() -> Arc<T>>,
}

impl<T: ?Sized + 'static> Key<T> {
	fn with(qualifier: QualifierRequest) -> Self {
		Self {
			contract: TypeKey::of::<T>(),
			qualifier,
			_contract: PhantomData,
		}
	}

	/// Every binding of `T`.
	pub fn any() -> Self {
		Self::with(QualifierRequest::Any)
	}

	/// Every name-qualified binding of `T`.
	pub fn any_named() -> Self {
		Self::with(QualifierRequest::AnyNamed)
	}

	/// Bindings of `T` named exactly `name`.
	pub fn named(name: impl Into<Arc<str>>) -> Self {
		Self::with(QualifierRequest::Named(name.into()))
	}

	/// Bindings of `T` carrying any marker of type `M`.
	pub fn any_marked<M: ?Sized + 'static>() -> Self {
		Self::with(QualifierRequest::AnyMarked(TypeKey::of::<M>()))
	}

	/// Bindings of `T` carrying exactly `marker`.
	pub fn marked(marker: Marker) -> Self {
		Self::with(QualifierRequest::Marked(marker))
	}

	pub fn contract(&self) -> TypeKey {
		self.contract
	}

	pub fn qualifier(&self) -> &QualifierRequest {
		&self.qualifier
	}
}

impl<T: ?Sized> Clone for Key<T> {
	fn clone(&self) -> Self {
		Self {
			contract: self.contract,
			qualifier: self.qualifier.clone(),
			_contract: PhantomData,
		}
	}
}

impl<T: ?Sized> PartialEq for Key<T> {
	fn eq(&self, other: &Self) -> bool {
		self.contract == other.contract && self.qualifier == other.qualifier
	}
}

impl<T: ?Sized> Eq for Key<T> {}

impl<T: ?Sized> Hash for Key<T> {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.contract.hash(state);
		self.qualifier.hash(state);
	}
}

impl<T: ?Sized> fmt::Debug for Key<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Key")
			.field("contract", &self.contract)
			.field("qualifier", &self.qualifier)
			.finish()
	}
}
