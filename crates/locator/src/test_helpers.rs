//! Contracts and sources shared by the unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{
	BeanLocator, BindingPublisher, BindingSubscriber, Injector, InjectorPublisher, Key, LocatedBeans, Rank,
	SourceId,
};

pub(crate) trait Greeter: Send + Sync {
	fn greet(&self) -> String;
}

pub(crate) struct Fixed(pub &'static str);

impl Greeter for Fixed {
	fn greet(&self) -> String {
		self.0.to_string()
	}
}

pub(crate) fn fixed(text: &'static str) -> Arc<dyn Greeter> {
	Arc::new(Fixed(text))
}

/// Marker type used as a qualifier.
pub(crate) struct Colour;

pub(crate) fn init_tracing() {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Builds an injector with `(name, text)` greeter bindings; an empty name binds the default.
pub(crate) fn greeters(label: &'static str, bindings: &[(&str, &'static str)]) -> Arc<Injector> {
	let mut builder = Injector::builder(label);
	for &(name, text) in bindings {
		let binding = builder.bind::<dyn Greeter>();
		if name.is_empty() {
			binding.to_instance(fixed(text));
		} else {
			binding.named(name).to_instance(fixed(text));
		}
	}
	builder.build()
}

pub(crate) fn greetings(beans: &LocatedBeans<dyn Greeter>) -> Vec<String> {
	beans
		.iter()
		.map(|entry| entry.value().map(|g| g.greet()).unwrap_or_else(|e| e.to_string()))
		.collect()
}

pub(crate) fn locate_all(locator: &BeanLocator) -> LocatedBeans<dyn Greeter> {
	locator.locate(Key::<dyn Greeter>::any())
}

/// Publisher that counts how often it is subscribed.
pub(crate) struct CountingPublisher {
	inner: InjectorPublisher,
	subscribed: AtomicUsize,
}

impl CountingPublisher {
	pub(crate) fn new(injector: Arc<Injector>, rank: Rank) -> Arc<Self> {
		Arc::new(Self {
			inner: InjectorPublisher::ranked(injector, rank),
			subscribed: AtomicUsize::new(0),
		})
	}

	pub(crate) fn subscribed(&self) -> usize {
		self.subscribed.load(Ordering::SeqCst)
	}
}

impl BindingPublisher for CountingPublisher {
	fn source_id(&self) -> SourceId {
		self.inner.source_id()
	}

	fn max_binding_rank(&self) -> Rank {
		self.inner.max_binding_rank()
	}

	fn subscribe(&self, subscriber: &dyn BindingSubscriber) {
		self.subscribed.fetch_add(1, Ordering::SeqCst);
		self.inner.subscribe(subscriber);
	}
}
