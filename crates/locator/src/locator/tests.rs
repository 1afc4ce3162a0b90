use std::sync::Arc;

use pretty_assertions::assert_eq;

use super::*;
use crate::beans::BeanEntry;
use crate::error::BoxError;
use crate::test_helpers::{CountingPublisher, Greeter, greeters, greetings, locate_all};

#[test]
fn re_adding_a_source_is_a_no_op() {
	let locator = BeanLocator::new();
	let injector = greeters("one", &[("", "a")]);
	assert!(locator.add_injector(&injector, 0));
	assert!(!locator.add_injector(&injector, 5), "same injector under another rank");
	assert_eq!(locator.publishers().len(), 1);

	let other = greeters("other", &[]);
	assert!(!locator.remove_injector(&other));
	assert_eq!(locator.publishers().len(), 1);

	assert!(locator.remove_injector(&injector));
	assert!(!locator.remove_injector(&injector));
	assert!(locator.publishers().is_empty());
}

#[test]
fn publishers_are_ordered_by_max_rank() {
	let locator = BeanLocator::new();
	let low = greeters("low", &[]);
	let high = greeters("high", &[]);
	let tie = greeters("tie", &[]);
	locator.add_injector(&low, 1);
	locator.add_injector(&high, 9);
	locator.add_injector(&tie, 1);
	let order: Vec<SourceId> = locator.publishers().iter().map(|p| p.source_id()).collect();
	assert_eq!(order, vec![high.id(), low.id(), tie.id()]);
}

#[test]
fn views_see_sources_added_after_locate() {
	let locator = BeanLocator::new();
	let beans = locate_all(&locator);
	assert!(beans.is_empty());

	locator.add_injector(&greeters("late", &[("", "late")]), 3);
	locator.add_injector(&greeters("later", &[("", "later")]), 7);
	assert_eq!(greetings(&beans), vec!["later", "late"]);
}

#[test]
fn located_contracts_are_held_weakly() {
	let locator = BeanLocator::new();
	locator.add_injector(&greeters("one", &[("", "a")]), 0);

	let beans = locate_all(&locator);
	let first = beans.iter().next().unwrap();
	assert_eq!(locator.cached_types(), 1);

	drop(beans);
	assert_eq!(locator.cached_types(), 0);

	let again = locate_all(&locator);
	let second = again.iter().next().unwrap();
	assert!(!first.ptr_eq(&second), "a fresh view realizes fresh entries");
	assert_eq!(locator.cached_types(), 1);
}

#[test]
fn views_of_one_contract_share_imported_bindings() {
	let locator = BeanLocator::new();
	let counting = CountingPublisher::new(greeters("one", &[("", "a"), ("n", "b")]), 0);
	locator.add(counting.clone());

	let all = locate_all(&locator);
	let named = locator.locate(Key::<dyn Greeter>::named("n"));
	assert_eq!(greetings(&all), vec!["a", "b"]);
	assert_eq!(greetings(&named), vec!["b"]);
	assert_eq!(counting.subscribed(), 1);
	assert_eq!(locator.cached_types(), 1);
}

#[test]
fn removing_a_source_updates_live_views() {
	let locator = BeanLocator::new();
	let keep = greeters("keep", &[("", "kept")]);
	let gone = greeters("gone", &[("n", "gone")]);
	locator.add_injector(&keep, 0);
	locator.add_injector(&gone, 0);
	let beans = locate_all(&locator);
	assert_eq!(greetings(&beans), vec!["kept", "gone"]);

	locator.remove_injector(&gone);
	assert_eq!(greetings(&beans), vec!["kept"]);
	locator.clear();
	assert!(beans.is_empty());
}

#[test]
fn default_rank_comes_from_config() {
	let locator = BeanLocator::with_config(LocatorConfig {
		default_rank: 50,
		..LocatorConfig::default()
	});
	let configured = greeters("configured", &[("", "configured")]);
	locator.add_injector_default(&configured);
	locator.add_injector(&greeters("explicit", &[("", "explicit")]), 10);
	assert_eq!(greetings(&locate_all(&locator)), vec!["configured", "explicit"]);
	assert_eq!(locator.publishers()[0].max_binding_rank(), 50);
}

/// Mediator that locates from inside its callback.
struct Reentrant {
	locator: Arc<BeanLocator>,
}

impl Mediator<dyn Greeter, Mutex<Vec<usize>>> for Reentrant {
	fn add(&self, _entry: &BeanEntry<dyn Greeter>, watcher: &Mutex<Vec<usize>>) -> Result<(), BoxError> {
		let seen = locate_all(&self.locator).iter().count();
		watcher.lock().push(seen);
		Ok(())
	}

	fn remove(&self, _entry: &BeanEntry<dyn Greeter>, _watcher: &Mutex<Vec<usize>>) -> Result<(), BoxError> {
		Ok(())
	}
}

#[test]
fn mediators_can_reenter_the_locator() {
	let locator = Arc::new(BeanLocator::new());
	locator.add_injector(&greeters("one", &[("", "a"), ("n", "b")]), 0);
	let seen = Arc::new(Mutex::new(Vec::new()));
	locator.watch(
		Key::<dyn Greeter>::any(),
		Reentrant {
			locator: Arc::clone(&locator),
		},
		&seen,
	);
	assert_eq!(*seen.lock(), vec![2, 2]);
}

/// The named bindings of S(-1) and S(0) share the lowest rank; registration decides, not pulling.
#[test]
fn order_only_depends_on_registration_history() {
	let low = greeters("low", &[("", "d-1"), ("n", "n-1")]);
	let high = greeters("high", &[("", "d0"), ("n", "n0")]);

	let untouched = BeanLocator::new();
	untouched.add_injector(&low, -1);
	untouched.add_injector(&high, 0);

	let observed = BeanLocator::new();
	observed.add_injector(&low, -1);
	let beans = locate_all(&observed);
	assert_eq!(greetings(&beans), vec!["d-1", "n-1"]);
	observed.add_injector(&high, 0);

	let expected = vec!["d0", "d-1", "n0", "n-1"];
	assert_eq!(greetings(&locate_all(&untouched)), expected);
	assert_eq!(greetings(&beans), expected);
	assert_eq!(greetings(&locate_all(&observed)), expected);
}
