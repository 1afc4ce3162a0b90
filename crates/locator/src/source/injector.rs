use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::SourceId;
use crate::binding::{AnyBinding, Binding, BindingId, BindingKind, Factory, Implementation, Memo, Scope};
use crate::error::BoxError;
use crate::key::{Contract, Qualifier, TypeKey};

/// Immutable set of bindings from one origin.
///
/// Built once through [`InjectorBuilder`]; sources come and go from a locator as a whole.
pub struct Injector {
	id: SourceId,
	name: Arc<str>,
	exact: FxHashMap<TypeId, Vec<AnyBinding>>,
	assignable: FxHashMap<TypeId, Vec<AnyBinding>>,
}

impl Injector {
	pub fn builder(name: impl Into<Arc<str>>) -> InjectorBuilder {
		InjectorBuilder {
			id: SourceId::next(),
			name: name.into(),
			exact: FxHashMap::default(),
			assignable: FxHashMap::default(),
		}
	}

	pub fn id(&self) -> SourceId {
		self.id
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Bindings declared for exactly `contract`, in declaration order.
	pub fn bindings_of(&self, contract: TypeKey) -> &[AnyBinding] {
		self.exact.get(&contract.id()).map_or(&[], Vec::as_slice)
	}

	/// Bindings that declared themselves assignable to `contract`.
	pub fn assignable_to(&self, contract: TypeKey) -> &[AnyBinding] {
		self.assignable.get(&contract.id()).map_or(&[], Vec::as_slice)
	}

	/// Total number of bindings, assignable declarations included.
	pub fn len(&self) -> usize {
		self.exact.values().chain(self.assignable.values()).map(Vec::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl fmt::Debug for Injector {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Injector")
			.field("id", &self.id)
			.field("name", &self.name)
			.field("bindings", &self.len())
			.finish()
	}
}

/// Collects bindings for a new [`Injector`].
pub struct InjectorBuilder {
	id: SourceId,
	name: Arc<str>,
	exact: FxHashMap<TypeId, Vec<AnyBinding>>,
	assignable: FxHashMap<TypeId, Vec<AnyBinding>>,
}

impl InjectorBuilder {
	/// Starts a binding of contract `T`.
	pub fn bind<T: ?Sized + Contract>(&mut self) -> BindingBuilder<'_, T> {
		let origin = self.name.clone();
		BindingBuilder {
			owner: self,
			qualifier: None,
			scope: Scope::Unscoped,
			hidden: false,
			origin,
			_contract: std::marker::PhantomData,
		}
	}

	pub fn build(self) -> Arc<Injector> {
		Arc::new(Injector {
			id: self.id,
			name: self.name,
			exact: self.exact,
			assignable: self.assignable,
		})
	}
}

/// Declares one binding; finished by one of the `to_*` methods.
pub struct BindingBuilder<'a, T: ?Sized> {
	owner: &'a mut InjectorBuilder,
	qualifier: Option<Qualifier>,
	scope: Scope,
	hidden: bool,
	origin: Arc<str>,
	_contract: std::marker::PhantomData<fn() -> Arc<T>>,
}

impl<T: ?Sized + Contract> BindingBuilder<'_, T> {
	pub fn named(self, name: impl Into<Arc<str>>) -> Self {
		self.qualified(Qualifier::named(name))
	}

	/// Attaches a qualifier; [`Qualifier::Default`] leaves the binding unqualified.
	pub fn qualified(mut self, qualifier: impl Into<Qualifier>) -> Self {
		let qualifier = qualifier.into();
		self.qualifier = (!qualifier.is_default()).then_some(qualifier);
		self
	}

	pub fn in_scope(mut self, scope: Scope) -> Self {
		self.scope = scope;
		self
	}

	pub fn singleton(self) -> Self {
		self.in_scope(Scope::Singleton)
	}

	/// Keeps the binding out of every published view.
	pub fn hidden(mut self) -> Self {
		self.hidden = true;
		self
	}

	/// Overrides the origin descriptor, which defaults to the injector name.
	pub fn origin(mut self, origin: impl Into<Arc<str>>) -> Self {
		self.origin = origin.into();
		self
	}

	pub fn to_instance(self, value: Arc<T>) -> Arc<Binding<T>> {
		self.finish(BindingKind::Instance {
			value,
			implementation: None,
		})
	}

	pub fn to_instance_of(self, value: Arc<T>, implementation: Implementation) -> Arc<Binding<T>> {
		self.finish(BindingKind::Instance {
			value,
			implementation: Some(implementation),
		})
	}

	pub fn to_constructor(
		self,
		implementation: Implementation,
		factory: impl Fn() -> Result<Arc<T>, BoxError> + Send + Sync + 'static,
	) -> Arc<Binding<T>> {
		self.finish(BindingKind::Constructor {
			implementation,
			factory: Arc::new(factory),
		})
	}

	pub fn to_provider(
		self,
		factory: impl Fn() -> Result<Arc<T>, BoxError> + Send + Sync + 'static,
	) -> Arc<Binding<T>> {
		self.finish(BindingKind::Provider(Arc::new(factory)))
	}

	/// Delegates to `target`, typically a binding of the same contract under another qualifier.
	pub fn to_binding(self, target: &Arc<Binding<T>>) -> Arc<Binding<T>> {
		self.finish(BindingKind::Linked(Arc::clone(target)))
	}

	/// Re-exports `target` from a private group of bindings.
	pub fn to_exposed(self, target: &Arc<Binding<T>>) -> Arc<Binding<T>> {
		self.finish(BindingKind::Exposed(Arc::clone(target)))
	}

	/// Declares that `target`, bound as `S`, can also serve requests for `T`.
	///
	/// Such bindings are only published for `T` when the injector has no exact binding of `T`.
	/// The qualifier and visibility default to the target's.
	pub fn to_assignable<S: ?Sized + Contract>(
		mut self,
		target: &Arc<Binding<S>>,
		upcast: impl Fn(Arc<S>) -> Arc<T> + Send + Sync + 'static,
	) -> Arc<Binding<T>> {
		if self.qualifier.is_none() {
			self.qualifier = target.qualifier().cloned();
		}
		self.hidden |= target.is_hidden();
		let source = Arc::clone(target);
		let factory: Factory<T> = Arc::new(move || -> Result<Arc<T>, BoxError> {
			Ok(upcast(source.provide()?))
		});
		let kind = match target.implementation() {
			Some(implementation) => BindingKind::Constructor {
				implementation: implementation.clone(),
				factory,
			},
			None => BindingKind::Provider(factory),
		};
		let binding = self.build(kind);
		self.owner
			.assignable
			.entry(TypeId::of::<T>())
			.or_default()
			.push(AnyBinding::from(Arc::clone(&binding)));
		binding
	}

	fn build(&self, kind: BindingKind<T>) -> Arc<Binding<T>> {
		Arc::new(Binding {
			id: BindingId::next(),
			contract: TypeKey::of::<T>(),
			qualifier: self.qualifier.clone(),
			kind,
			scope: self.scope,
			source: self.owner.id,
			origin: Arc::clone(&self.origin),
			hidden: self.hidden,
			singleton: Memo::default(),
		})
	}

	fn finish(self, kind: BindingKind<T>) -> Arc<Binding<T>> {
		let binding = self.build(kind);
		self.owner
			.exact
			.entry(TypeId::of::<T>())
			.or_default()
			.push(AnyBinding::from(Arc::clone(&binding)));
		binding
	}
}
