//! Name-hint lookups layered over [`LocatedBeans`].
//!
//! A hint selects the bean whose qualifier is `Named(hint)`; the hint `"default"` selects the
//! unqualified bean. Hints nothing satisfies still produce an entry, which fails only when its
//! value is requested.

use std::fmt;
use std::sync::Arc;

use crate::beans::{BeanEntry, LocatedBeans};
use crate::error::LocatorError;
use crate::key::{Contract, Qualifier};

/// Beans of one contract looked up by hint, in hint order.
pub struct HintedBeans<T: ?Sized + Contract> {
	beans: LocatedBeans<T>,
	hints: Vec<Arc<str>>,
}

impl<T: ?Sized + Contract> HintedBeans<T> {
	pub(crate) fn new<S: AsRef<str>>(beans: LocatedBeans<T>, hints: &[S]) -> Self {
		Self {
			beans,
			hints: hints.iter().map(|h| Arc::from(h.as_ref())).collect(),
		}
	}

	pub fn hints(&self) -> &[Arc<str>] {
		&self.hints
	}

	/// Resolves the hints against the sources registered right now.
	///
	/// Without hints, every default or name-qualified bean is returned in rank order.
	pub fn resolve(&self) -> Vec<HintedEntry<T>> {
		if self.hints.is_empty() {
			return self
				.beans
				.iter()
				.filter(|entry| matches!(entry.key(), Qualifier::Default | Qualifier::Named(_)))
				.map(HintedEntry::Found)
				.collect();
		}
		self.hints
			.iter()
			.map(|hint| match self.beans.iter().find(|entry| entry.key().matches_hint(hint)) {
				Some(entry) => HintedEntry::Found(entry),
				None => HintedEntry::Missing {
					hint: Arc::clone(hint),
				},
			})
			.collect()
	}
}

impl<T: ?Sized + Contract> fmt::Debug for HintedBeans<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("HintedBeans")
			.field("beans", &self.beans)
			.field("hints", &self.hints)
			.finish()
	}
}

/// Outcome of one hint.
pub enum HintedEntry<T: ?Sized + Contract> {
	Found(BeanEntry<T>),
	/// No bean satisfied the hint; [`HintedEntry::value`] fails.
	Missing { hint: Arc<str> },
}

impl<T: ?Sized + Contract> HintedEntry<T> {
	/// The hint this entry answers, or the hint that would select the matched bean.
	///
	/// `None` for a bean no hint can select, such as a marker-qualified one.
	pub fn hint(&self) -> Option<&str> {
		match self {
			Self::Found(entry) => match entry.key() {
				Qualifier::Default => Some(Qualifier::DEFAULT_HINT),
				Qualifier::Named(name) => Some(&**name),
				Qualifier::Marked(_) => None,
			},
			Self::Missing { hint } => Some(&**hint),
		}
	}

	pub fn entry(&self) -> Option<&BeanEntry<T>> {
		match self {
			Self::Found(entry) => Some(entry),
			Self::Missing { .. } => None,
		}
	}

	pub fn is_missing(&self) -> bool {
		matches!(self, Self::Missing { .. })
	}

	pub fn value(&self) -> Result<Arc<T>, LocatorError> {
		match self {
			Self::Found(entry) => Ok(entry.value()?),
			Self::Missing { hint } => Err(LocatorError::MissingHint {
				hint: Arc::clone(hint),
				contract: std::any::type_name::<T>(),
			}),
		}
	}
}

impl<T: ?Sized + Contract> Clone for HintedEntry<T> {
	fn clone(&self) -> Self {
		match self {
			Self::Found(entry) => Self::Found(entry.clone()),
			Self::Missing { hint } => Self::Missing { hint: Arc::clone(hint) },
		}
	}
}

impl<T: ?Sized + Contract> fmt::Debug for HintedEntry<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Found(entry) => f.debug_tuple("Found").field(entry).finish(),
			Self::Missing { hint } => f.debug_struct("Missing").field("hint", hint).finish(),
		}
	}
}
