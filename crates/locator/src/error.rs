use std::sync::Arc;

use crate::binding::BindingId;

/// Boxed error returned by factories and mediator callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A binding's factory failed to produce an instance.
#[derive(Debug, Clone, thiserror::Error)]
#[error("failed to provision {contract} from binding {binding} ({origin}): {reason}")]
pub struct ProvisionError {
	pub binding: BindingId,
	pub contract: &'static str,
	pub origin: Arc<str>,
	pub reason: Arc<str>,
}

/// Errors surfaced to callers of the locator.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LocatorError {
	#[error("unsupported operation: {0}")]
	Unsupported(&'static str),

	#[error("no more elements")]
	NoSuchElement,

	#[error("no {contract} bean for hint {hint:?}")]
	MissingHint { hint: Arc<str>, contract: &'static str },

	#[error(transparent)]
	Provision(#[from] ProvisionError),

	#[error("invalid locator config: {0}")]
	Config(String),
}
