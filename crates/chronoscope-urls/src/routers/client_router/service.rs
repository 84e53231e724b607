//! Location service.
//!
//! [`LocationService`] mirrors the navigation history into a reactive
//! [`Signal`]. There is one per application; it is a cheap handle and is
//! passed explicitly to whatever needs to read or change the location.
//!
//! Writes (`push`, `replace`) update the history and the signal together.
//! Traversals (`pop`, or the user pressing back) reach the signal through
//! the history listener.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use chronoscope_core::reactive::{Signal, Subscription};

use super::config::RoutingConfig;
use super::error::Result;
use super::history::{History, HistoryListener};
use super::link::{ClickEvent, LinkHandler, is_plain_click};
use super::location::LocationInfo;

struct ServiceInner {
	history: Rc<dyn History>,
	current: Signal<LocationInfo>,
	base: Vec<String>,
	config: RoutingConfig,
	listener: RefCell<Option<HistoryListener>>,
}

/// Synchronizes the current location with the navigation history.
#[derive(Clone)]
pub struct LocationService {
	inner: Rc<ServiceInner>,
}

fn strip_base(location: LocationInfo, base: &[String]) -> LocationInfo {
	if base.is_empty() {
		return location;
	}
	match location.path().strip_prefix(base) {
		Some(rest) => {
			let rest = rest.to_vec();
			location.with_segments(rest)
		}
		None => {
			tracing::trace!(location = %location, "location outside base path");
			location
		}
	}
}

fn prepend_base(location: &LocationInfo, base: &[String]) -> LocationInfo {
	if base.is_empty() {
		return location.clone();
	}
	location.with_segments(base.iter().chain(location.path()).cloned())
}

impl LocationService {
	/// Attaches to `history`.
	///
	/// # Errors
	///
	/// Returns an error if `config` is invalid, or if the history cannot
	/// report its location or accept a listener.
	pub fn new<H>(history: H, config: &RoutingConfig) -> Result<Self>
	where
		H: History + 'static,
	{
		let base = config.base_segments()?;
		let history: Rc<dyn History> = Rc::new(history);
		let current = Signal::new(strip_base(history.location()?, &base));

		let listener = {
			let current = current.clone();
			let base = base.clone();
			history.listen(Rc::new(move |location: LocationInfo| {
				let location = strip_base(location, &base);
				tracing::debug!(location = %location, "history traversal");
				current.set(location);
			}))?
		};

		Ok(Self {
			inner: Rc::new(ServiceInner {
				history,
				current,
				base,
				config: config.clone(),
				listener: RefCell::new(Some(listener)),
			}),
		})
	}

	/// Attaches to the browser's `window.history`.
	///
	/// # Errors
	///
	/// Returns [`RoutingError::HistoryUnavailable`](super::RoutingError::HistoryUnavailable)
	/// when no browser window is available.
	#[cfg(target_arch = "wasm32")]
	pub fn browser(config: &RoutingConfig) -> Result<Self> {
		Self::new(super::browser::BrowserHistory::new()?, config)
	}

	/// Attaches to the browser's `window.history`.
	///
	/// # Errors
	///
	/// Always returns [`RoutingError::HistoryUnavailable`](super::RoutingError::HistoryUnavailable)
	/// outside `wasm32`.
	#[cfg(not(target_arch = "wasm32"))]
	pub fn browser(config: &RoutingConfig) -> Result<Self> {
		let _ = config;
		Err(super::error::RoutingError::HistoryUnavailable(
			"not running in a browser".to_string(),
		))
	}

	/// The current location, relative to the base path.
	pub fn current(&self) -> LocationInfo {
		self.inner.current.get()
	}

	/// Reads the current location without cloning it.
	pub fn with_current<R>(&self, f: impl FnOnce(&LocationInfo) -> R) -> R {
		self.inner.current.with(f)
	}

	/// The reactive cell holding the current location.
	pub fn signal(&self) -> Signal<LocationInfo> {
		self.inner.current.clone()
	}

	/// Runs `callback` after every location change.
	pub fn subscribe<F>(&self, callback: F) -> Subscription
	where
		F: Fn() + 'static,
	{
		self.inner.current.subscribe(callback)
	}

	/// Navigates to `location`, adding a history entry.
	///
	/// # Errors
	///
	/// Propagates history failures; the current location is unchanged then.
	pub fn push(&self, location: &LocationInfo) -> Result<()> {
		tracing::debug!(location = %location, "push");
		self.inner
			.history
			.push(&prepend_base(location, &self.inner.base))?;
		self.inner.current.set(location.clone());
		Ok(())
	}

	/// Navigates to `location`, overwriting the current history entry.
	///
	/// # Errors
	///
	/// Propagates history failures; the current location is unchanged then.
	pub fn replace(&self, location: &LocationInfo) -> Result<()> {
		tracing::debug!(location = %location, "replace");
		self.inner
			.history
			.replace(&prepend_base(location, &self.inner.base))?;
		self.inner.current.set(location.clone());
		Ok(())
	}

	/// Requests a back navigation.
	///
	/// Always returns `true`; the new location arrives later through the
	/// history listener, so it is not current yet when this returns. A
	/// history that rejects the request is logged and leaves the location
	/// unchanged.
	pub fn pop(&self) -> bool {
		if let Err(e) = self.inner.history.back() {
			tracing::warn!(error = %e, "back navigation failed");
		}
		true
	}

	/// URL for `location`, including the base path.
	pub fn href(&self, location: &LocationInfo) -> String {
		prepend_base(location, &self.inner.base).build()
	}

	/// Link to `location`; a plain click pushes it.
	pub fn location_to_on_click(&self, location: LocationInfo) -> LinkHandler {
		let href = self.href(&location);
		let service = self.clone();
		LinkHandler::new(
			href,
			Rc::new(move |event: &dyn ClickEvent| {
				if !is_plain_click(event) {
					return;
				}
				event.prevent_default();
				if let Err(e) = service.push(&location) {
					tracing::warn!(location = %location, error = %e, "link navigation failed");
				}
			}),
		)
	}

	/// Stops listening to the history. Later traversals are not reflected.
	pub fn detach(&self) {
		if self.inner.listener.borrow_mut().take().is_some() {
			tracing::debug!("location service detached");
		}
	}

	/// Whether the history listener is still attached.
	pub fn is_attached(&self) -> bool {
		self.inner.listener.borrow().is_some()
	}

	/// The configuration this service was created with.
	pub fn config(&self) -> &RoutingConfig {
		&self.inner.config
	}
}

impl fmt::Debug for LocationService {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LocationService")
			.field("current", &self.inner.current.with(LocationInfo::build))
			.field("config", &self.inner.config)
			.field("attached", &self.is_attached())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::routers::client_router::{MemoryHistory, PopCallback, RoutingError, SyntheticClick};
	use rstest::{fixture, rstest};
	use std::cell::Cell;

	#[fixture]
	fn history() -> MemoryHistory {
		MemoryHistory::at("/timeline?server=foo").unwrap()
	}

	fn loc(url: &str) -> LocationInfo {
		LocationInfo::parse(url).unwrap()
	}

	fn counter(service: &LocationService) -> (Rc<Cell<usize>>, Subscription) {
		let count = Rc::new(Cell::new(0));
		let subscription = {
			let count = Rc::clone(&count);
			service.subscribe(move || count.set(count.get() + 1))
		};
		(count, subscription)
	}

	#[rstest]
	fn test_initial_location(history: MemoryHistory) {
		let service = LocationService::new(history, &RoutingConfig::default()).unwrap();
		assert_eq!(service.current(), loc("/timeline?server=foo"));
		assert!(service.is_attached());
	}

	#[rstest]
	fn test_push_updates_history_and_notifies_once(history: MemoryHistory) {
		// Arrange
		let service = LocationService::new(history.clone(), &RoutingConfig::default()).unwrap();
		let (count, _subscription) = counter(&service);

		// Act
		service.push(&loc("/plot")).unwrap();

		// Assert
		assert_eq!(count.get(), 1);
		assert_eq!(service.current(), loc("/plot"));
		assert_eq!(history.len(), 2);
	}

	#[rstest]
	fn test_replace_keeps_history_length(history: MemoryHistory) {
		let service = LocationService::new(history.clone(), &RoutingConfig::default()).unwrap();

		service.replace(&loc("/plot")).unwrap();

		assert_eq!(history.len(), 1);
		assert_eq!(history.location().unwrap(), loc("/plot"));
	}

	#[rstest]
	fn test_pop_arrives_through_listener(history: MemoryHistory) {
		// Arrange
		let service = LocationService::new(history.clone(), &RoutingConfig::default()).unwrap();
		service.push(&loc("/plot")).unwrap();
		let (count, _subscription) = counter(&service);

		// Act
		assert!(service.pop());

		// Assert: nothing changes before the traversal is delivered
		assert_eq!(service.current(), loc("/plot"));
		assert_eq!(count.get(), 0);

		history.flush();
		assert_eq!(service.current(), loc("/timeline?server=foo"));
		assert_eq!(count.get(), 1);
	}

	/// A history whose traversals always fail.
	struct StuckHistory(MemoryHistory);

	impl History for StuckHistory {
		fn location(&self) -> Result<LocationInfo> {
			self.0.location()
		}

		fn push(&self, location: &LocationInfo) -> Result<()> {
			self.0.push(location)
		}

		fn replace(&self, location: &LocationInfo) -> Result<()> {
			self.0.replace(location)
		}

		fn back(&self) -> Result<()> {
			Err(RoutingError::Navigation("traversal blocked".to_string()))
		}

		fn listen(&self, callback: PopCallback) -> Result<HistoryListener> {
			self.0.listen(callback)
		}
	}

	#[rstest]
	fn test_pop_returns_true_when_history_rejects(history: MemoryHistory) {
		// Arrange
		let service =
			LocationService::new(StuckHistory(history), &RoutingConfig::default()).unwrap();
		service.push(&loc("/plot")).unwrap();
		let (count, _subscription) = counter(&service);

		// Act
		let requested = service.pop();

		// Assert
		assert!(requested);
		assert_eq!(count.get(), 0);
		assert_eq!(service.current(), loc("/plot"));
	}

	#[rstest]
	fn test_detach_stops_following_history(history: MemoryHistory) {
		let service = LocationService::new(history.clone(), &RoutingConfig::default()).unwrap();
		service.push(&loc("/plot")).unwrap();

		service.detach();
		service.pop();
		history.flush();

		assert!(!service.is_attached());
		assert_eq!(history.listener_count(), 0);
		assert_eq!(service.current(), loc("/plot"));
	}

	#[rstest]
	fn test_base_path_is_stripped_and_prepended() {
		// Arrange
		let history = MemoryHistory::at("/app/timeline").unwrap();
		let config = RoutingConfig::default().with_base_path("/app");
		let service = LocationService::new(history.clone(), &config).unwrap();

		// Act
		service.push(&loc("/plot?server=foo")).unwrap();

		// Assert
		assert_eq!(history.entries()[0], loc("/app/timeline"));
		assert_eq!(history.location().unwrap(), loc("/app/plot?server=foo"));
		assert_eq!(service.current(), loc("/plot?server=foo"));
		assert_eq!(service.href(&loc("/buckets")), "/app/buckets");
	}

	#[rstest]
	fn test_invalid_config_is_rejected(history: MemoryHistory) {
		let config = RoutingConfig::default().with_base_path("app");

		let result = LocationService::new(history, &config);

		assert!(matches!(result, Err(RoutingError::Config(_))));
	}

	#[rstest]
	fn test_location_to_on_click(history: MemoryHistory) {
		// Arrange
		let service = LocationService::new(history, &RoutingConfig::default()).unwrap();
		let link = service.location_to_on_click(loc("/stopwatch"));
		let plain = SyntheticClick::primary();
		let modified = SyntheticClick::with_modifier();

		// Act
		link.click(&modified);
		let after_modified = service.current();
		link.click(&plain);

		// Assert
		assert_eq!(link.href(), "/stopwatch");
		assert!(!modified.default_prevented());
		assert_eq!(after_modified, loc("/timeline?server=foo"));
		assert!(plain.default_prevented());
		assert_eq!(service.current(), loc("/stopwatch"));
	}

	#[cfg(not(target_arch = "wasm32"))]
	#[rstest]
	fn test_browser_is_unavailable_natively() {
		assert!(matches!(
			LocationService::browser(&RoutingConfig::default()),
			Err(RoutingError::HistoryUnavailable(_))
		));
	}
}
