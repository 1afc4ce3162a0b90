use std::sync::Arc;

use crate::test_helpers::{Greeter, fixed, greeters, locate_all};
use crate::{BeanLocator, Injector, Qualifier};

#[test]
fn values_provision_in_rank_order() {
	let locator = BeanLocator::new();
	locator.add_injector(&greeters("low", &[("", "low")]), 1);
	locator.add_injector(&greeters("high", &[("", "high")]), 2);
	let beans = locate_all(&locator);
	let values: Vec<String> = beans.values().map(|v| v.unwrap().greet()).collect();
	assert_eq!(values, vec!["high", "low"]);
}

#[test]
fn values_surface_provision_failures() {
	let mut builder = Injector::builder("broken");
	builder.bind::<dyn Greeter>().to_provider(|| Err("no instance".into()));
	builder.bind::<dyn Greeter>().named("ok").to_instance(fixed("ok"));
	let locator = BeanLocator::new();
	locator.add_injector(&builder.build(), 0);

	let beans = locate_all(&locator);
	let outcomes: Vec<bool> = beans.values().map(|v| v.is_ok()).collect();
	assert_eq!(outcomes, vec![false, true]);
}

#[test]
fn map_lookup_prefers_the_highest_ranked_entry() {
	let locator = BeanLocator::new();
	locator.add_injector(&greeters("low", &[("", "low default"), ("dup", "low dup")]), 1);
	locator.add_injector(&greeters("high", &[("", "high default"), ("dup", "high dup")]), 2);
	let beans = locate_all(&locator);
	let map = beans.as_map();

	let greet = |q: &Qualifier| map.get(q).map(|e| e.value().unwrap().greet());
	assert_eq!(greet(&Qualifier::Default).as_deref(), Some("high default"));
	assert_eq!(greet(&Qualifier::named("dup")).as_deref(), Some("high dup"));
	assert!(!map.contains_key(&Qualifier::named("missing")));

	let snapshot = map.snapshot();
	assert_eq!(snapshot.len(), 2);
	assert_eq!(map.keys(), vec![Qualifier::Default, Qualifier::named("dup")]);
	let first = snapshot.get_index(0).map(|(_, e)| Arc::clone(e.binding()));
	assert_eq!(first.map(|b| b.origin().to_string()), Some("high".to_string()));
}
