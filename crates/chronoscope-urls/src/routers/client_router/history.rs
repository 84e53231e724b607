//! Navigation-history backends.
//!
//! [`History`] is the boundary to the host's navigation history. Two
//! backends exist:
//!
//! - `BrowserHistory` (wasm32 only) drives `window.history` and listens to
//!   `popstate`.
//! - [`MemoryHistory`] keeps an in-memory entry stack, for non-browser hosts
//!   and tests.
//!
//! Backends report only navigations they did not initiate (back/forward)
//! through their listeners, the way the browser fires `popstate` for
//! traversal but not for `pushState`.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use super::error::Result;
use super::location::LocationInfo;

/// Callback invoked with the new location after a history traversal.
pub type PopCallback = Rc<dyn Fn(LocationInfo)>;

/// The host's navigation history.
pub trait History {
	/// Reads the location of the current entry.
	fn location(&self) -> Result<LocationInfo>;

	/// Appends a new entry and makes it current.
	fn push(&self, location: &LocationInfo) -> Result<()>;

	/// Overwrites the current entry.
	fn replace(&self, location: &LocationInfo) -> Result<()>;

	/// Requests a back navigation.
	///
	/// The resulting location is delivered later through the listeners, not
	/// by this call.
	fn back(&self) -> Result<()>;

	/// Registers a traversal listener; dropping the guard detaches it.
	fn listen(&self, callback: PopCallback) -> Result<HistoryListener>;
}

/// Guard for a registered history listener.
#[must_use = "dropping a HistoryListener immediately detaches it"]
pub struct HistoryListener {
	release: Option<Box<dyn FnOnce()>>,
}

impl HistoryListener {
	/// Creates a guard that runs `release` when dropped.
	pub fn new<F>(release: F) -> Self
	where
		F: FnOnce() + 'static,
	{
		Self {
			release: Some(Box::new(release)),
		}
	}

	/// Detaches the listener now.
	pub fn detach(self) {}
}

impl Drop for HistoryListener {
	fn drop(&mut self) {
		if let Some(release) = self.release.take() {
			release();
		}
	}
}

impl fmt::Debug for HistoryListener {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("HistoryListener")
			.field("attached", &self.release.is_some())
			.finish()
	}
}

#[derive(Debug)]
struct MemoryState {
	entries: Vec<LocationInfo>,
	index: usize,
	/// Queued traversals, delivered by `flush()`.
	pending: VecDeque<isize>,
}

type ListenerList = RefCell<Vec<(u64, PopCallback)>>;

/// In-memory navigation history.
///
/// `back()` and `forward()` only queue a traversal; [`MemoryHistory::flush`]
/// performs the queued traversals and notifies listeners, the way a browser
/// delivers `popstate` after `history.back()` returns.
///
/// Clones share the same history.
#[derive(Clone)]
pub struct MemoryHistory {
	state: Rc<RefCell<MemoryState>>,
	listeners: Rc<ListenerList>,
	next_listener: Rc<Cell<u64>>,
}

impl MemoryHistory {
	/// Creates a history with a single entry.
	pub fn new(initial: LocationInfo) -> Self {
		Self {
			state: Rc::new(RefCell::new(MemoryState {
				entries: vec![initial],
				index: 0,
				pending: VecDeque::new(),
			})),
			listeners: Rc::new(RefCell::new(Vec::new())),
			next_listener: Rc::new(Cell::new(0)),
		}
	}

	/// Creates a history whose single entry is parsed from `url`.
	///
	/// # Errors
	///
	/// Returns [`RoutingError::MalformedPath`](super::RoutingError::MalformedPath)
	/// if `url` does not start with `/`.
	pub fn at(url: &str) -> Result<Self> {
		Ok(Self::new(LocationInfo::parse(url)?))
	}

	/// Queues a forward navigation.
	pub fn forward(&self) {
		self.state.borrow_mut().pending.push_back(1);
	}

	/// Queues a traversal by `delta` entries.
	pub fn go(&self, delta: isize) {
		self.state.borrow_mut().pending.push_back(delta);
	}

	/// Performs queued traversals, notifying listeners for each one that
	/// changes the current entry. Returns the number of notifications.
	pub fn flush(&self) -> usize {
		let mut delivered = 0;
		loop {
			let target = {
				let mut state = self.state.borrow_mut();
				let Some(delta) = state.pending.pop_front() else {
					break;
				};
				let last = state.entries.len() - 1;
				let index = state.index.saturating_add_signed(delta).min(last);
				if index == state.index {
					continue;
				}
				state.index = index;
				state.entries[index].clone()
			};

			tracing::trace!(location = %target, "memory history traversal");
			let snapshot: Vec<PopCallback> = self
				.listeners
				.borrow()
				.iter()
				.map(|(_, callback)| Rc::clone(callback))
				.collect();
			for callback in snapshot {
				callback(target.clone());
			}
			delivered += 1;
		}
		delivered
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.state.borrow().entries.len()
	}

	/// Always false: a history has at least one entry.
	pub fn is_empty(&self) -> bool {
		false
	}

	/// Index of the current entry.
	pub fn index(&self) -> usize {
		self.state.borrow().index
	}

	/// Number of queued traversals.
	pub fn pending(&self) -> usize {
		self.state.borrow().pending.len()
	}

	/// All entries, oldest first.
	pub fn entries(&self) -> Vec<LocationInfo> {
		self.state.borrow().entries.clone()
	}

	/// Number of attached listeners.
	pub fn listener_count(&self) -> usize {
		self.listeners.borrow().len()
	}
}

impl History for MemoryHistory {
	fn location(&self) -> Result<LocationInfo> {
		let state = self.state.borrow();
		Ok(state.entries[state.index].clone())
	}

	fn push(&self, location: &LocationInfo) -> Result<()> {
		let mut state = self.state.borrow_mut();
		let next = state.index + 1;
		state.entries.truncate(next);
		state.entries.push(location.clone());
		state.index = next;
		Ok(())
	}

	fn replace(&self, location: &LocationInfo) -> Result<()> {
		let mut state = self.state.borrow_mut();
		let index = state.index;
		state.entries[index] = location.clone();
		Ok(())
	}

	fn back(&self) -> Result<()> {
		self.state.borrow_mut().pending.push_back(-1);
		Ok(())
	}

	fn listen(&self, callback: PopCallback) -> Result<HistoryListener> {
		let id = self.next_listener.get();
		self.next_listener.set(id + 1);
		self.listeners.borrow_mut().push((id, callback));

		let listeners = Rc::downgrade(&self.listeners);
		Ok(HistoryListener::new(move || {
			if let Some(listeners) = listeners.upgrade() {
				listeners.borrow_mut().retain(|(existing, _)| *existing != id);
			}
		}))
	}
}

impl fmt::Debug for MemoryHistory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let state = self.state.borrow();
		f.debug_struct("MemoryHistory")
			.field("entries", &state.entries.len())
			.field("index", &state.index)
			.field("pending", &state.pending.len())
			.field("listeners", &self.listeners.borrow().len())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};

	#[fixture]
	fn history() -> MemoryHistory {
		MemoryHistory::at("/timeline").unwrap()
	}

	fn loc(url: &str) -> LocationInfo {
		LocationInfo::parse(url).unwrap()
	}

	fn recorder(history: &MemoryHistory) -> (Rc<RefCell<Vec<String>>>, HistoryListener) {
		let seen = Rc::new(RefCell::new(Vec::new()));
		let listener = {
			let seen = Rc::clone(&seen);
			history
				.listen(Rc::new(move |location: LocationInfo| {
					seen.borrow_mut().push(location.build())
				}))
				.unwrap()
		};
		(seen, listener)
	}

	#[rstest]
	fn test_push_and_replace(history: MemoryHistory) {
		history.push(&loc("/plot")).unwrap();
		history.replace(&loc("/plot?server=foo")).unwrap();

		assert_eq!(history.len(), 2);
		assert_eq!(history.index(), 1);
		assert_eq!(history.location().unwrap().build(), "/plot?server=foo");
	}

	#[rstest]
	fn test_back_is_deferred_until_flush(history: MemoryHistory) {
		// Arrange
		history.push(&loc("/plot")).unwrap();
		let (seen, _listener) = recorder(&history);

		// Act
		history.back().unwrap();

		// Assert: nothing happens until the traversal is delivered
		assert_eq!(history.location().unwrap().build(), "/plot");
		assert!(seen.borrow().is_empty());

		assert_eq!(history.flush(), 1);
		assert_eq!(history.location().unwrap().build(), "/timeline");
		assert_eq!(*seen.borrow(), vec!["/timeline".to_string()]);
	}

	#[rstest]
	fn test_back_at_first_entry_is_silent(history: MemoryHistory) {
		let (seen, _listener) = recorder(&history);

		history.back().unwrap();

		assert_eq!(history.flush(), 0);
		assert!(seen.borrow().is_empty());
	}

	#[rstest]
	fn test_forward_after_back(history: MemoryHistory) {
		history.push(&loc("/plot")).unwrap();
		history.back().unwrap();
		history.forward();

		assert_eq!(history.flush(), 2);
		assert_eq!(history.index(), 1);
	}

	#[rstest]
	fn test_push_discards_forward_entries(history: MemoryHistory) {
		history.push(&loc("/a")).unwrap();
		history.push(&loc("/b")).unwrap();
		history.go(-2);
		history.flush();

		history.push(&loc("/c")).unwrap();

		let urls: Vec<String> = history.entries().iter().map(LocationInfo::build).collect();
		assert_eq!(urls, vec!["/timeline", "/c"]);
	}

	#[rstest]
	fn test_dropping_listener_detaches(history: MemoryHistory) {
		history.push(&loc("/plot")).unwrap();
		let (seen, listener) = recorder(&history);
		assert_eq!(history.listener_count(), 1);

		listener.detach();
		history.back().unwrap();
		history.flush();

		assert_eq!(history.listener_count(), 0);
		assert!(seen.borrow().is_empty());
	}
}
