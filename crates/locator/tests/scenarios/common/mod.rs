//! Common contracts and sources for locator scenarios.

use std::sync::Arc;

use bindery_locator::{BeanLocator, Injector, Key, LocatedBeans};

pub trait Service: Send + Sync {
	fn label(&self) -> &str;
}

pub struct Labelled(pub String);

impl Service for Labelled {
	fn label(&self) -> &str {
		&self.0
	}
}

pub fn service(label: &str) -> Arc<dyn Service> {
	Arc::new(Labelled(label.to_string()))
}

pub fn init_tracing() {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Injector binding `(name, label)` pairs; an empty name binds the unqualified service.
pub fn source(name: &str, bindings: &[(&str, &str)]) -> Arc<Injector> {
	let mut builder = Injector::builder(name);
	for (qualifier, label) in bindings {
		let binding = builder.bind::<dyn Service>();
		if qualifier.is_empty() {
			binding.to_instance(service(label));
		} else {
			binding.named(*qualifier).to_instance(service(label));
		}
	}
	builder.build()
}

pub fn all(locator: &BeanLocator) -> LocatedBeans<dyn Service> {
	locator.locate(Key::<dyn Service>::any())
}

pub fn labels(beans: &LocatedBeans<dyn Service>) -> Vec<String> {
	beans
		.values()
		.map(|value| value.map(|s| s.label().to_string()).unwrap_or_else(|e| e.to_string()))
		.collect()
}
