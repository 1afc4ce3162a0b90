use std::sync::Arc;

use bindery_locator::{BeanEntry, BeanLocator, BoxError, Key, Mediator, Qualifier};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;

use crate::common::{Service, init_tracing, source};

/// Watcher mirroring the named services currently available.
#[derive(Default)]
struct Directory {
	live: Mutex<Vec<(String, String)>>,
	removed: Mutex<Vec<String>>,
}

impl Directory {
	fn live(&self) -> Vec<(String, String)> {
		self.live.lock().clone()
	}
}

struct Register;

impl Mediator<dyn Service, Directory> for Register {
	fn add(&self, entry: &BeanEntry<dyn Service>, directory: &Directory) -> Result<(), BoxError> {
		let name = entry.key().name().unwrap_or("default").to_string();
		let label = entry.value()?.label().to_string();
		directory.live.lock().push((name, label));
		Ok(())
	}

	fn remove(&self, entry: &BeanEntry<dyn Service>, directory: &Directory) -> Result<(), BoxError> {
		let name = entry.key().name().unwrap_or("default").to_string();
		let label = entry.value()?.label().to_string();
		directory.live.lock().retain(|(n, l)| !(n == &name && l == &label));
		directory.removed.lock().push(label);
		Ok(())
	}
}

fn pair(name: &str, label: &str) -> (String, String) {
	(name.to_string(), label.to_string())
}

#[test]
fn watches_mirror_sources_symmetrically() {
	init_tracing();
	let locator = BeanLocator::new();
	let early = source("early", &[("alpha", "a1"), ("", "d1")]);
	locator.add_injector(&early, 1);

	let directory = Arc::new(Directory::default());
	assert!(locator.watch(Key::<dyn Service>::any_named(), Register, &directory).is_none());
	assert_eq!(directory.live(), vec![pair("alpha", "a1")]);

	let late = source("late", &[("beta", "b1")]);
	locator.add_injector(&late, 2);
	assert_eq!(directory.live(), vec![pair("alpha", "a1"), pair("beta", "b1")]);

	locator.remove_injector(&early);
	assert_eq!(directory.live(), vec![pair("beta", "b1")]);
	locator.remove_injector(&late);
	assert!(directory.live().is_empty());
	assert_eq!(*directory.removed.lock(), vec!["a1", "b1"]);
}

#[test]
fn watching_one_name_ignores_the_rest() {
	let locator = BeanLocator::new();
	locator.add_injector(&source("one", &[("alpha", "a"), ("beta", "b")]), 0);

	let directory = Arc::new(Directory::default());
	locator.watch(Key::<dyn Service>::named("beta"), Register, &directory);
	assert_eq!(directory.live(), vec![pair("beta", "b")]);
}

#[test]
fn second_watch_of_the_same_watcher_is_ignored() {
	let locator = BeanLocator::new();
	locator.add_injector(&source("one", &[("alpha", "a")]), 0);

	let directory = Arc::new(Directory::default());
	assert!(locator.watch(Key::<dyn Service>::any(), Register, &directory).is_none());
	let existing = locator.watch(Key::<dyn Service>::any(), Register, &directory);
	assert!(existing.is_some_and(|w| Arc::ptr_eq(&w, &directory)));
	assert_eq!(directory.live().len(), 1);
	assert_eq!(locator.active_watches(), 1);
}

#[test]
fn dropped_watchers_are_released() {
	let locator = BeanLocator::new();
	locator.add_injector(&source("one", &[("alpha", "a")]), 0);

	let directory = Arc::new(Directory::default());
	locator.watch(Key::<dyn Service>::any(), Register, &directory);
	assert_eq!(locator.active_watches(), 1);
	drop(directory);
	assert_eq!(locator.active_watches(), 0);

	locator.add_injector(&source("two", &[("beta", "b")]), 0);
	assert_eq!(locator.publishers().len(), 2);
}

#[test]
fn clearing_the_locator_empties_watchers() {
	let locator = BeanLocator::new();
	locator.add_injector(&source("one", &[("", "d"), ("alpha", "a")]), 0);

	let directory = Arc::new(Directory::default());
	locator.watch(Key::<dyn Service>::any(), Register, &directory);
	assert_eq!(directory.live().len(), 2);

	locator.clear();
	assert!(directory.live().is_empty());

	locator.add_injector(&source("two", &[("beta", "b")]), 0);
	assert_eq!(directory.live(), vec![pair("beta", "b")]);
	assert_eq!(
		locator.locate(Key::<dyn Service>::named("beta")).iter().map(|e| e.key().clone()).collect::<Vec<_>>(),
		vec![Qualifier::named("beta")]
	);
}
