//! The routing engine.
//!
//! [`Routing`] ties a [`Router`] to a [`LocationService`]: it exposes the
//! route matching the current location as a lazily recomputed value, and
//! navigates through typed routes, carrying declared query parameters over
//! from the current location.

use std::fmt;
use std::rc::Rc;

use chronoscope_core::reactive::{Memo, Subscription};

use super::args::{Args, QueryArgs};
use super::error::Result;
use super::link::LinkHandler;
use super::location::LocationInfo;
use super::route::Route;
use super::router::{RouteMatch, Router};
use super::service::LocationService;

/// Result of resolving the current location.
#[derive(Debug, Clone, PartialEq)]
pub enum CurrentRoute<D> {
	/// A route matched.
	Found(RouteMatch<D>),
	/// No route matched this location.
	NotFound(LocationInfo),
}

impl<D> CurrentRoute<D> {
	/// Whether a route matched.
	pub fn is_found(&self) -> bool {
		matches!(self, Self::Found(_))
	}

	/// The match, if any.
	pub fn as_match(&self) -> Option<&RouteMatch<D>> {
		match self {
			Self::Found(matched) => Some(matched),
			Self::NotFound(_) => None,
		}
	}

	/// The matched route's data, if any.
	pub fn data(&self) -> Option<&D> {
		self.as_match().map(|matched| &matched.data)
	}
}

struct RoutingInner<D: 'static, C: 'static> {
	router: Router<D, C>,
	location: LocationService,
	context: Rc<C>,
	current: Memo<CurrentRoute<D>>,
}

/// Keeps the current route in sync with the location.
///
/// Cheap to clone; clones share the same state.
pub struct Routing<D: 'static, C: 'static = ()> {
	inner: Rc<RoutingInner<D, C>>,
}

impl<D: 'static> Routing<D> {
	/// Creates a routing engine whose factories take no context.
	pub fn new(router: Router<D>, location: LocationService) -> Self {
		Self::with_context(router, location, ())
	}
}

impl<D: 'static, C: 'static> Routing<D, C> {
	/// Creates a routing engine passing `context` to every factory.
	pub fn with_context(router: Router<D, C>, location: LocationService, context: C) -> Self {
		let context = Rc::new(context);
		let current = {
			let router = router.clone();
			let context = Rc::clone(&context);
			Memo::new(&location.signal(), move |location: &LocationInfo| {
				match router.route(location, &context) {
					Some(matched) => CurrentRoute::Found(matched),
					None => CurrentRoute::NotFound(location.clone()),
				}
			})
		};

		Self {
			inner: Rc::new(RoutingInner {
				router,
				location,
				context,
				current,
			}),
		}
	}

	/// The route matching the current location.
	///
	/// Resolved on the first call after each location change and cached
	/// until the next one.
	pub fn current(&self) -> Rc<CurrentRoute<D>> {
		self.inner.current.get()
	}

	/// Runs `callback` once per location change.
	pub fn subscribe<F>(&self, callback: F) -> Subscription
	where
		F: Fn() + 'static,
	{
		self.inner.current.subscribe(callback)
	}

	/// Builds the location for a route, filling in query parameters.
	///
	/// Every query parameter `route` declares and `query` does not mention
	/// is copied from the current location, unless query inheritance is
	/// disabled in the configuration. Use [`QueryArgs::unset`] to drop a
	/// parameter instead of inheriting it.
	///
	/// # Errors
	///
	/// Propagates [`Route::build`] errors.
	pub fn location_info(
		&self,
		route: &Route,
		args: &Args,
		query: &QueryArgs,
	) -> Result<LocationInfo> {
		let location = route.build(args, query)?;
		if !self.inner.location.config().inherit_query {
			return Ok(location);
		}

		let mut search = location.search().clone();
		self.inner.location.with_current(|current| {
			for key in route.query_schema().keys() {
				if query.is_specified(key) {
					continue;
				}
				if let Some(value) = current.query(key) {
					search.insert(key.clone(), value.to_string());
				}
			}
		});
		Ok(location.with_search(search))
	}

	/// Navigates to a route, adding a history entry.
	///
	/// # Errors
	///
	/// Propagates build and history errors.
	pub fn push(&self, route: &Route, args: &Args, query: &QueryArgs) -> Result<()> {
		let location = self.location_info(route, args, query)?;
		self.inner.location.push(&location)
	}

	/// Navigates to a route, overwriting the current history entry.
	///
	/// # Errors
	///
	/// Propagates build and history errors.
	pub fn replace(&self, route: &Route, args: &Args, query: &QueryArgs) -> Result<()> {
		let location = self.location_info(route, args, query)?;
		self.inner.location.replace(&location)
	}

	/// Navigates to a location as given, adding a history entry.
	///
	/// # Errors
	///
	/// Propagates history errors.
	pub fn push_location(&self, location: &LocationInfo) -> Result<()> {
		self.inner.location.push(location)
	}

	/// Navigates to a location as given, overwriting the current entry.
	///
	/// # Errors
	///
	/// Propagates history errors.
	pub fn replace_location(&self, location: &LocationInfo) -> Result<()> {
		self.inner.location.replace(location)
	}

	/// Requests a back navigation. See [`LocationService::pop`].
	pub fn pop(&self) -> bool {
		self.inner.location.pop()
	}

	/// Link to a route, with query parameters inherited as of now.
	///
	/// # Errors
	///
	/// Propagates build errors.
	pub fn route_to_on_click(
		&self,
		route: &Route,
		args: &Args,
		query: &QueryArgs,
	) -> Result<LinkHandler> {
		let location = self.location_info(route, args, query)?;
		Ok(self.inner.location.location_to_on_click(location))
	}

	/// Link to a location as given.
	pub fn location_to_on_click(&self, location: LocationInfo) -> LinkHandler {
		self.inner.location.location_to_on_click(location)
	}

	/// Stops following the history; the current route keeps its last value.
	pub fn dispose(&self) {
		self.inner.location.detach();
		self.inner.current.detach();
	}

	/// The route registry.
	pub fn router(&self) -> &Router<D, C> {
		&self.inner.router
	}

	/// The location service.
	pub fn location_service(&self) -> &LocationService {
		&self.inner.location
	}

	/// The context handed to factories.
	pub fn context(&self) -> &C {
		&self.inner.context
	}
}

impl<D: 'static, C: 'static> Clone for Routing<D, C> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<D: 'static, C: 'static> fmt::Debug for Routing<D, C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Routing")
			.field("router", &self.inner.router)
			.field("location", &self.inner.location)
			.field("stale", &self.inner.current.is_stale())
			.finish()
	}
}
