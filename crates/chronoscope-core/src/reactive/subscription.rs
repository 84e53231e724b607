//! Subscriber lists and subscription guards.

use core::cell::RefCell;
use core::fmt;
use core::sync::atomic::{AtomicUsize, Ordering};

extern crate alloc;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;

/// Unique identifier for reactive nodes and subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
	/// Create a new unique NodeId
	pub fn new() -> Self {
		static COUNTER: AtomicUsize = AtomicUsize::new(0);
		Self(COUNTER.fetch_add(1, Ordering::Relaxed))
	}
}

impl Default for NodeId {
	fn default() -> Self {
		Self::new()
	}
}

type Callback = Rc<dyn Fn()>;
type CallbackList = RefCell<Vec<(NodeId, Callback)>>;

/// Shared list of change callbacks.
#[derive(Clone, Default)]
pub(crate) struct Subscribers {
	list: Rc<CallbackList>,
}

impl Subscribers {
	pub(crate) fn subscribe<F>(&self, callback: F) -> Subscription
	where
		F: Fn() + 'static,
	{
		let id = NodeId::new();
		self.list.borrow_mut().push((id, Rc::new(callback)));
		Subscription {
			id,
			list: Rc::downgrade(&self.list),
		}
	}

	/// Calls every subscriber once.
	///
	/// The list is snapshotted first, so callbacks may read the source,
	/// subscribe or drop their own subscription while being notified.
	pub(crate) fn notify(&self) {
		let snapshot: Vec<Callback> = self
			.list
			.borrow()
			.iter()
			.map(|(_, callback)| Rc::clone(callback))
			.collect();

		for callback in snapshot {
			callback();
		}
	}

	pub(crate) fn len(&self) -> usize {
		self.list.borrow().len()
	}
}

/// Guard for a registered change callback.
///
/// The callback stays registered for as long as the guard is alive.
#[must_use = "dropping a Subscription immediately detaches its callback"]
pub struct Subscription {
	id: NodeId,
	list: Weak<CallbackList>,
}

impl Subscription {
	/// Returns the identifier of this subscription.
	pub fn id(&self) -> NodeId {
		self.id
	}

	/// Returns whether the source this subscription belongs to still exists.
	pub fn is_active(&self) -> bool {
		self.list
			.upgrade()
			.is_some_and(|list| list.borrow().iter().any(|(id, _)| *id == self.id))
	}

	/// Detaches the callback. Equivalent to dropping the guard.
	pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		if let Some(list) = self.list.upgrade() {
			list.borrow_mut().retain(|(id, _)| *id != self.id);
		}
	}
}

impl fmt::Debug for Subscription {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Subscription")
			.field("id", &self.id)
			.field("active", &self.is_active())
			.finish()
	}
}
