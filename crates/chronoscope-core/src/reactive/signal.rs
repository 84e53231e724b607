//! Signal - mutable reactive cell
//!
//! `Signal<T>` holds a value and notifies its subscribers whenever the value
//! is written.
//!
//! ## Key Features
//!
//! - **Notify on write**: every `set()` or `update()` notifies each
//!   subscriber exactly once, whether or not the value changed.
//! - **Lightweight**: cloning a signal clones two `Rc`s; all clones share the
//!   same value and subscriber list.
//! - **Re-entrancy safe**: subscribers may read the signal while being
//!   notified.
//!
//! ## Example
//!
//! ```
//! use chronoscope_core::reactive::Signal;
//!
//! let count = Signal::new(0);
//! count.set(42);
//! assert_eq!(count.get(), 42);
//!
//! count.update(|n| *n += 1);
//! assert_eq!(count.get(), 43);
//! ```

use core::cell::RefCell;
use core::fmt;

extern crate alloc;
use alloc::rc::Rc;

use super::subscription::{NodeId, Subscribers, Subscription};

/// A reactive cell that holds a value and notifies subscribers on writes
///
/// ## Cloning
///
/// `Signal<T>` implements `Clone` and shares the value via `Rc<RefCell<T>>`.
/// All clones of the same Signal observe the same value and subscribers.
pub struct Signal<T: 'static> {
	/// Unique identifier for this signal
	id: NodeId,
	/// The actual value, shared via reference counting
	value: Rc<RefCell<T>>,
	/// Change callbacks
	subscribers: Subscribers,
}

impl<T: 'static> Clone for Signal<T> {
	fn clone(&self) -> Self {
		Self {
			id: self.id,
			value: Rc::clone(&self.value),
			subscribers: self.subscribers.clone(),
		}
	}
}

impl<T: 'static> Signal<T> {
	/// Create a new Signal with the given initial value
	pub fn new(value: T) -> Self {
		Self {
			id: NodeId::new(),
			value: Rc::new(RefCell::new(value)),
			subscribers: Subscribers::default(),
		}
	}

	/// Get a clone of the current value
	pub fn get(&self) -> T
	where
		T: Clone,
	{
		self.value.borrow().clone()
	}

	/// Read the current value through a closure without cloning it
	///
	/// # Panics
	///
	/// Panics if `f` writes to this same signal.
	pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
		f(&self.value.borrow())
	}

	/// Set the signal to a new value and notify subscribers
	pub fn set(&self, value: T) {
		*self.value.borrow_mut() = value;
		self.subscribers.notify();
	}

	/// Update the value in place and notify subscribers once
	pub fn update<F>(&self, f: F)
	where
		F: FnOnce(&mut T),
	{
		f(&mut self.value.borrow_mut());
		self.subscribers.notify();
	}

	/// Register a callback that runs after every write
	pub fn subscribe<F>(&self, callback: F) -> Subscription
	where
		F: Fn() + 'static,
	{
		self.subscribers.subscribe(callback)
	}

	/// Number of live subscriptions
	pub fn subscriber_count(&self) -> usize {
		self.subscribers.len()
	}

	/// Get the NodeId of this signal
	pub fn id(&self) -> NodeId {
		self.id
	}
}

impl<T: fmt::Debug + 'static> fmt::Debug for Signal<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Signal")
			.field("id", &self.id)
			.field("value", &*self.value.borrow())
			.field("subscribers", &self.subscribers.len())
			.finish()
	}
}
