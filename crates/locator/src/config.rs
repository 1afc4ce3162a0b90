use serde::{Deserialize, Serialize};

use crate::error::LocatorError;

/// Tunables for a [`BeanLocator`](crate::BeanLocator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocatorConfig {
	/// Primary rank given to injectors added without an explicit rank.
	pub default_rank: i32,
	/// Contain mediator panics instead of unwinding through the caller.
	pub catch_mediator_panics: bool,
}

impl Default for LocatorConfig {
	fn default() -> Self {
		Self {
			default_rank: 0,
			catch_mediator_panics: true,
		}
	}
}

impl LocatorConfig {
	/// Parses a TOML document; missing keys keep their defaults.
	pub fn from_toml_str(source: &str) -> Result<Self, LocatorError> {
		toml::from_str(source).map_err(|error| LocatorError::Config(error.to_string()))
	}
}

#[cfg(test)]
mod tests;
