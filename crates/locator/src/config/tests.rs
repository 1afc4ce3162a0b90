use super::*;

#[test]
fn missing_keys_keep_defaults() {
	let config = LocatorConfig::from_toml_str("default_rank = -3\n").unwrap();
	assert_eq!(
		config,
		LocatorConfig {
			default_rank: -3,
			catch_mediator_panics: true,
		}
	);
	assert_eq!(LocatorConfig::from_toml_str("").unwrap(), LocatorConfig::default());
}

#[test]
fn unknown_keys_are_rejected() {
	let error = LocatorConfig::from_toml_str("default_rnak = 1\n").unwrap_err();
	assert!(matches!(error, LocatorError::Config(message) if message.contains("default_rnak")));
}

#[test]
fn wrong_types_are_rejected() {
	assert!(LocatorConfig::from_toml_str("catch_mediator_panics = \"yes\"\n").is_err());
}
