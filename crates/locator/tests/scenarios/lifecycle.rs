use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use bindery_locator::{BeanLocator, HintedEntry, Injector, LocatorConfig, LocatorError};
use pretty_assertions::assert_eq;

use crate::common::{Service, all, init_tracing, labels, service, source};

#[test]
fn adding_a_source_twice_is_a_no_op() {
	init_tracing();
	let locator = BeanLocator::new();
	let injector = source("one", &[("", "a")]);
	assert!(locator.add_injector(&injector, 1));
	assert!(!locator.add_injector(&injector, 7));
	assert_eq!(locator.publishers().len(), 1);
	assert_eq!(labels(&all(&locator)), vec!["a"]);

	assert!(locator.remove_injector(&injector));
	assert!(!locator.remove_injector(&injector));
	assert!(labels(&all(&locator)).is_empty());
}

#[test]
fn views_follow_sources_as_they_come_and_go() {
	let locator = BeanLocator::new();
	let beans = all(&locator);
	assert!(beans.is_empty());

	let first = source("first", &[("a", "a")]);
	let second = source("second", &[("b", "b")]);
	locator.add_injector(&first, 1);
	locator.add_injector(&second, 2);
	assert_eq!(labels(&beans), vec!["b", "a"]);

	locator.remove_injector(&second);
	assert_eq!(labels(&beans), vec!["a"]);

	locator.clear();
	assert!(beans.is_empty());
	assert!(locator.publishers().is_empty());
}

#[test]
fn unused_contracts_are_forgotten() {
	let locator = BeanLocator::new();
	locator.add_injector(&source("one", &[("", "a")]), 0);

	let beans = all(&locator);
	let again = all(&locator);
	assert_eq!(locator.cached_types(), 1);
	drop(beans);
	assert_eq!(locator.cached_types(), 1);
	drop(again);
	assert_eq!(locator.cached_types(), 0);

	assert_eq!(labels(&all(&locator)), vec!["a"]);
}

#[test]
fn concurrent_first_reads_instantiate_once() {
	let constructed = Arc::new(AtomicUsize::new(0));
	let mut builder = Injector::builder("lazy");
	let counter = Arc::clone(&constructed);
	builder.bind::<dyn Service>().to_provider(move || {
		counter.fetch_add(1, Ordering::SeqCst);
		Ok(service("lazy"))
	});
	let locator = BeanLocator::new();
	locator.add_injector(&builder.build(), 0);

	let entry = all(&locator).iter().next().unwrap();
	let barrier = Arc::new(Barrier::new(8));
	let values: Vec<Arc<dyn Service>> = (0..8)
		.map(|_| {
			let entry = entry.clone();
			let barrier = Arc::clone(&barrier);
			thread::spawn(move || {
				barrier.wait();
				entry.value().unwrap()
			})
		})
		.collect::<Vec<_>>()
		.into_iter()
		.map(|handle| handle.join().unwrap())
		.collect();

	assert_eq!(constructed.load(Ordering::SeqCst), 1);
	assert!(values.iter().all(|v| Arc::ptr_eq(v, &values[0])));
}

#[test]
fn hints_select_beans_by_name() {
	let locator = BeanLocator::new();
	locator.add_injector(&source("one", &[("", "fallback"), ("fast", "fast")]), 0);

	let hinted = locator.locate_hinted::<dyn Service, _>(&["fast", "slow", "default"]);
	let resolved = hinted.resolve();
	let hints: Vec<Option<&str>> = resolved.iter().map(HintedEntry::hint).collect();
	assert_eq!(hints, vec![Some("fast"), Some("slow"), Some("default")]);
	assert!(resolved[1].is_missing());
	assert!(matches!(resolved[1].value(), Err(LocatorError::MissingHint { .. })));
	assert_eq!(resolved[2].value().map(|s| s.label().to_string()).ok().as_deref(), Some("fallback"));
}

#[test]
fn configured_default_rank_orders_unranked_sources() {
	let config = LocatorConfig::from_toml_str("default_rank = 10\n").unwrap();
	let locator = BeanLocator::with_config(config);
	locator.add_injector(&source("ranked", &[("", "explicit")]), 5);
	locator.add_injector_default(&source("unranked", &[("", "implicit")]));
	assert_eq!(labels(&all(&locator)), vec!["implicit", "explicit"]);
}
