use std::sync::Arc;

use bindery_locator::{BeanLocator, Injector, Key, Marker, Qualifier, Scope};
use pretty_assertions::assert_eq;

use crate::common::{Service, all, labels, service, source};

/// S2 (rank 5: `B` -> "y", default -> "z") added before S1 (rank 10: `A` -> "x").
#[test]
fn defaults_then_cross_source_rank_order() {
	let locator = BeanLocator::new();
	locator.add_injector(&source("S2", &[("B", "y"), ("", "z")]), 5);
	locator.add_injector(&source("S1", &[("A", "x")]), 10);

	let beans = all(&locator);
	assert_eq!(labels(&beans), vec!["z", "x", "y"]);
	let keys: Vec<Qualifier> = beans.iter().map(|e| e.key().clone()).collect();
	assert_eq!(keys, vec![Qualifier::Default, Qualifier::named("A"), Qualifier::named("B")]);
}

/// Equal-rank sources keep their registration order.
#[test]
fn equal_ranks_keep_registration_order() {
	let locator = BeanLocator::new();
	for (name, rank) in [("A", 5), ("B", 3), ("C", 5), ("D", 1)] {
		locator.add_injector(&source(name, &[("", name)]), rank);
	}
	assert_eq!(labels(&all(&locator)), vec!["A", "C", "B", "D"]);
}

/// The unqualified binding and a binding named "default" are two distinct beans.
#[test]
fn default_is_not_the_name_default() {
	let locator = BeanLocator::new();
	locator.add_injector(&source("one", &[("", "unqualified"), ("default", "named default")]), 0);

	let beans = all(&locator);
	let entries: Vec<_> = beans.iter().collect();
	assert_eq!(entries.len(), 2);
	assert_eq!(entries.iter().filter(|e| e.key().is_default()).count(), 1);
	assert_eq!(entries[0].key(), &Qualifier::Default);
	assert_eq!(entries[1].key(), &Qualifier::named("default"));

	let named = locator.locate(Key::<dyn Service>::named("default"));
	assert_eq!(labels(&named), vec!["named default"]);
	let any_named = locator.locate(Key::<dyn Service>::any_named());
	assert_eq!(labels(&any_named), vec!["named default"]);
}

struct Region;

#[test]
fn marker_requests_see_binding_and_implementation_markers() {
	let eu = Marker::of::<Region>().with("code", "eu");
	let us = Marker::of::<Region>().with("code", "us");

	let mut builder = Injector::builder("regions");
	builder
		.bind::<dyn Service>()
		.qualified(eu.clone())
		.to_instance(service("eu service"));
	builder.bind::<dyn Service>().to_constructor(
		bindery_locator::Implementation::of::<crate::common::Labelled>().marked(us.clone()),
		|| Ok(service("us service")),
	);
	builder.bind::<dyn Service>().named("global").to_instance(service("global"));
	let locator = BeanLocator::new();
	locator.add_injector(&builder.build(), 0);

	let regional = locator.locate(Key::<dyn Service>::any_marked::<Region>());
	assert_eq!(labels(&regional), vec!["us service", "eu service"]);
	let only_us = locator.locate(Key::<dyn Service>::marked(us.clone()));
	let entries: Vec<_> = only_us.iter().collect();
	assert_eq!(entries.len(), 1);
	assert_eq!(entries[0].key(), &Qualifier::Marked(us));
}

#[test]
fn hidden_bindings_never_surface() {
	let mut builder = Injector::builder("hidden");
	builder.bind::<dyn Service>().hidden().to_instance(service("internal"));
	builder.bind::<dyn Service>().named("public").to_instance(service("public"));
	let locator = BeanLocator::new();
	locator.add_injector(&builder.build(), 0);
	assert_eq!(labels(&all(&locator)), vec!["public"]);
}

#[test]
fn linked_and_exposed_bindings_share_the_target_instance() {
	let mut builder = Injector::builder("links");
	let target = builder
		.bind::<dyn Service>()
		.named("target")
		.in_scope(Scope::Singleton)
		.to_provider(|| Ok(service("target")));
	builder.bind::<dyn Service>().named("linked").to_binding(&target);
	builder.bind::<dyn Service>().named("exposed").to_exposed(&target);
	let locator = BeanLocator::new();
	locator.add_injector(&builder.build(), 0);

	let values: Vec<Arc<dyn Service>> = all(&locator).values().map(Result::unwrap).collect();
	assert_eq!(values.len(), 3);
	assert!(values.iter().all(|v| Arc::ptr_eq(v, &values[0])));
	assert!(values.iter().all(|v| v.label() == "target"));
}
