//! Memo - lazily recomputed derived value
//!
//! A `Memo<T>` derives its value from a source [`Signal`]. When the source is
//! written, the memo drops its cached value and notifies its own
//! subscribers, but does not recompute. The next `get()` recomputes once and
//! caches the result until the source is written again.
//!
//! This gives consumers a consistent view: a subscriber notified about a
//! change that reads the memo always sees the value derived from the
//! source's latest state.
//!
//! The computation runs on a snapshot of the source, so it may write to the
//! source itself. A value computed while the source changed underneath it is
//! returned but not cached; the next `get()` recomputes.

use core::cell::{Cell, RefCell};
use core::fmt;

extern crate alloc;
use alloc::boxed::Box;
use alloc::rc::Rc;

use super::signal::Signal;
use super::subscription::{NodeId, Subscribers, Subscription};

struct MemoInner<T: 'static> {
	id: NodeId,
	compute: Box<dyn Fn() -> T>,
	cached: RefCell<Option<Rc<T>>>,
	/// Bumped on every invalidation.
	version: Cell<u64>,
	subscribers: Subscribers,
	/// Keeps the memo attached to its source for as long as it lives.
	source: RefCell<Option<Subscription>>,
}

impl<T: 'static> MemoInner<T> {
	fn invalidate(&self) {
		self.version.set(self.version.get().wrapping_add(1));
		self.cached.borrow_mut().take();
		self.subscribers.notify();
	}
}

/// A derived value recomputed on the first read after its source changes
pub struct Memo<T: 'static> {
	inner: Rc<MemoInner<T>>,
}

impl<T: 'static> Clone for Memo<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<T: 'static> Memo<T> {
	/// Create a memo deriving its value from `source`
	///
	/// Nothing is computed until the first `get()`.
	pub fn new<S, F>(source: &Signal<S>, compute: F) -> Self
	where
		S: Clone + 'static,
		F: Fn(&S) -> T + 'static,
	{
		let tracked = source.clone();
		let inner = Rc::new(MemoInner {
			id: NodeId::new(),
			compute: Box::new(move || compute(&tracked.get())),
			cached: RefCell::new(None),
			version: Cell::new(0),
			subscribers: Subscribers::default(),
			source: RefCell::new(None),
		});

		let weak = Rc::downgrade(&inner);
		let subscription = source.subscribe(move || {
			if let Some(inner) = weak.upgrade() {
				inner.invalidate();
			}
		});
		*inner.source.borrow_mut() = Some(subscription);

		Self { inner }
	}

	/// Get the current value, recomputing it if the source changed
	pub fn get(&self) -> Rc<T> {
		let cached = self.inner.cached.borrow().clone();
		if let Some(value) = cached {
			return value;
		}

		tracing::trace!(memo = ?self.inner.id, "recomputing memo");
		let version = self.inner.version.get();
		let value = Rc::new((self.inner.compute)());
		if self.inner.version.get() == version {
			*self.inner.cached.borrow_mut() = Some(Rc::clone(&value));
		} else {
			tracing::trace!(memo = ?self.inner.id, "source changed during recompute");
		}
		value
	}

	/// Whether the next `get()` will recompute
	pub fn is_stale(&self) -> bool {
		self.inner.cached.borrow().is_none()
	}

	/// Register a callback that runs whenever the source changes
	///
	/// The callback is told that the value changed; it reads the new value
	/// with `get()`.
	pub fn subscribe<F>(&self, callback: F) -> Subscription
	where
		F: Fn() + 'static,
	{
		self.inner.subscribers.subscribe(callback)
	}

	/// Detach from the source; the memo keeps its last cached value
	pub fn detach(&self) {
		self.inner.source.borrow_mut().take();
	}

	/// Get the NodeId of this memo
	pub fn id(&self) -> NodeId {
		self.inner.id
	}
}

impl<T: 'static> fmt::Debug for Memo<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Memo")
			.field("id", &self.inner.id)
			.field("stale", &self.is_stale())
			.field("subscribers", &self.inner.subscribers.len())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};

	struct Counted {
		source: Signal<i32>,
		memo: Memo<i32>,
		computations: Rc<Cell<usize>>,
	}

	#[fixture]
	fn counted() -> Counted {
		let source = Signal::new(1);
		let computations = Rc::new(Cell::new(0));
		let memo = {
			let computations = Rc::clone(&computations);
			Memo::new(&source, move |n| {
				computations.set(computations.get() + 1);
				n * 10
			})
		};
		Counted {
			source,
			memo,
			computations,
		}
	}

	#[rstest]
	fn test_memo_is_lazy(counted: Counted) {
		assert!(counted.memo.is_stale());
		assert_eq!(counted.computations.get(), 0);

		assert_eq!(*counted.memo.get(), 10);
		assert_eq!(counted.computations.get(), 1);
	}

	#[rstest]
	fn test_memo_caches_between_writes(counted: Counted) {
		counted.memo.get();
		counted.memo.get();
		counted.memo.get();

		assert_eq!(counted.computations.get(), 1);
	}

	#[rstest]
	fn test_memo_recomputes_once_per_write(counted: Counted) {
		counted.memo.get();

		counted.source.set(4);
		assert!(counted.memo.is_stale());
		assert_eq!(*counted.memo.get(), 40);
		assert_eq!(*counted.memo.get(), 40);

		assert_eq!(counted.computations.get(), 2);
	}

	#[rstest]
	fn test_memo_subscriber_sees_fresh_value(counted: Counted) {
		// Arrange
		let seen = Rc::new(RefCell::new(Vec::new()));
		let _subscription = {
			let memo = counted.memo.clone();
			let seen = Rc::clone(&seen);
			counted
				.memo
				.subscribe(move || seen.borrow_mut().push(*memo.get()))
		};

		// Act
		counted.source.set(2);
		counted.source.set(3);

		// Assert
		assert_eq!(*seen.borrow(), vec![20, 30]);
		assert_eq!(counted.computations.get(), 2);
	}

	#[rstest]
	fn test_detached_memo_keeps_last_value(counted: Counted) {
		counted.memo.get();
		counted.memo.detach();

		counted.source.set(9);

		assert!(!counted.memo.is_stale());
		assert_eq!(*counted.memo.get(), 10);
		assert_eq!(counted.source.subscriber_count(), 0);
	}

	#[rstest]
	fn test_compute_may_write_its_source() {
		// Arrange
		let source = Signal::new(1);
		let memo = {
			let writer = source.clone();
			Memo::new(&source, move |n: &i32| {
				if *n < 3 {
					writer.set(3);
				}
				n * 10
			})
		};

		// Act
		let first = memo.get();

		// Assert
		assert_eq!(*first, 10);
		assert!(memo.is_stale());
		assert_eq!(*memo.get(), 30);
		assert!(!memo.is_stale());
	}

	#[rstest]
	fn test_dropping_memo_releases_source_subscription() {
		let source = Signal::new(0);
		let memo = Memo::new(&source, |n| *n);
		assert_eq!(source.subscriber_count(), 1);

		drop(memo);

		assert_eq!(source.subscriber_count(), 0);
	}
}
