use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

/// Compute-once slot for a provisioned instance.
///
/// Racing first callers serialize on `init`; exactly one runs the initializer and the rest observe
/// its value. Failed initializations leave the slot empty so the next caller retries.
pub(crate) struct Memo<T: ?Sized> {
	value: OnceLock<Arc<T>>,
	init: Mutex<()>,
}

impl<T: ?Sized> Default for Memo<T> {
	fn default() -> Self {
		Self {
			value: OnceLock::new(),
			init: Mutex::new(()),
		}
	}
}

impl<T: ?Sized> Memo<T> {
	pub(crate) fn get(&self) -> Option<Arc<T>> {
		self.value.get().cloned()
	}

	pub(crate) fn get_or_try_init<E>(
		&self,
		init: impl FnOnce() -> Result<Arc<T>, E>,
	) -> Result<Arc<T>, E> {
		if let Some(value) = self.value.get() {
			return Ok(Arc::clone(value));
		}
		let _guard = self.init.lock();
		if let Some(value) = self.value.get() {
			return Ok(Arc::clone(value));
		}
		let value = init()?;
		let _ = self.value.set(Arc::clone(&value));
		Ok(value)
	}
}
