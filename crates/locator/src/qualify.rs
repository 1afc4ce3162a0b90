//! Deciding whether a binding satisfies a request and under which qualifier it is exposed.

use crate::binding::BindingInfo;
use crate::key::{Marker, Qualifier, QualifierRequest};

/// Matching rule chosen once per request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QualifyingStrategy {
	/// Every binding; unqualified ones surface as [`Qualifier::Default`].
	Unrestricted,
	/// Any name-qualified binding.
	Named,
	/// Name-qualified bindings with exactly the requested name.
	NamedWithAttributes,
	/// Bindings carrying a marker of the requested type, on the binding or its implementation.
	Marked,
	/// Bindings carrying exactly the requested marker, on the binding or its implementation.
	MarkedWithAttributes,
}

impl QualifyingStrategy {
	pub fn select_for(request: &QualifierRequest) -> Self {
		match request {
			QualifierRequest::Any => Self::Unrestricted,
			QualifierRequest::AnyNamed => Self::Named,
			QualifierRequest::Named(_) => Self::NamedWithAttributes,
			QualifierRequest::AnyMarked(_) => Self::Marked,
			QualifierRequest::Marked(_) => Self::MarkedWithAttributes,
		}
	}

	/// Returns the qualifier to expose when `binding` satisfies `request`.
	///
	/// `request` must be the request this strategy was selected for.
	pub fn qualifies(&self, request: &QualifierRequest, binding: &dyn BindingInfo) -> Option<Qualifier> {
		match (self, request) {
			(Self::Unrestricted, _) => Some(binding.qualifier().cloned().unwrap_or(Qualifier::Default)),
			(Self::Named, _) => binding.qualifier().filter(|q| q.name().is_some()).cloned(),
			(Self::NamedWithAttributes, QualifierRequest::Named(name)) => binding
				.qualifier()
				.filter(|q| q.name() == Some(&**name))
				.cloned(),
			(Self::Marked, QualifierRequest::AnyMarked(kind)) => marker_matching(binding, |m| m.kind() == *kind),
			(Self::MarkedWithAttributes, QualifierRequest::Marked(wanted)) => marker_matching(binding, |m| m == wanted),
			_ => None,
		}
	}
}

/// Binding-level marker first, then the implementation's own markers.
fn marker_matching(binding: &dyn BindingInfo, accept: impl Fn(&Marker) -> bool) -> Option<Qualifier> {
	if let Some(marker) = binding.qualifier().and_then(Qualifier::marker)
		&& accept(marker)
	{
		return Some(Qualifier::Marked(marker.clone()));
	}
	binding
		.implementation()?
		.markers()
		.iter()
		.find(|m| accept(m))
		.map(|m| Qualifier::Marked(m.clone()))
}
