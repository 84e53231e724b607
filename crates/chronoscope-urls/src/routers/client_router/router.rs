//! Route registry.
//!
//! A [`Router`] is a persistent list of `(route, factory)` entries. Adding a
//! route returns a new router that shares every existing entry with the one
//! it was derived from, so routers are cheap to extend and to clone.
//!
//! The most recently added entry is tried first. A later route therefore
//! shadows an earlier one for every location both match:
//!
//! ```
//! use chronoscope_urls::routers::client_router::{ArgKind, LocationInfo, Route, Router};
//!
//! let router: Router<&str> = Router::new()
//!     .with(Route::new("/:id", [("id", ArgKind::String)]), |_, _| "by id")
//!     .with(Route::fixed("/users"), |_, _| "users");
//!
//! let location = LocationInfo::parse("/users").unwrap();
//! assert_eq!(router.route(&location, &()).unwrap().data, "users");
//! ```

use std::fmt;
use std::sync::Arc;

use super::args::RouteArgs;
use super::location::LocationInfo;
use super::route::Route;

/// Produces the data associated with a matched route.
pub type DataFactory<D, C> = Arc<dyn Fn(&C, &RouteArgs) -> D + Send + Sync>;

struct Entry<D, C> {
	route: Route,
	factory: DataFactory<D, C>,
	next: Option<Arc<Entry<D, C>>>,
}

/// A matched route with its decoded arguments and produced data.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMatch<D> {
	/// The route that matched.
	pub route: Route,
	/// Arguments decoded from the location.
	pub args: RouteArgs,
	/// Data returned by the route's factory.
	pub data: D,
}

/// An immutable route registry.
///
/// `D` is the data a match produces; `C` is the context handed to every
/// factory.
pub struct Router<D, C = ()> {
	head: Option<Arc<Entry<D, C>>>,
	len: usize,
}

impl<D, C> Router<D, C> {
	/// Creates an empty router.
	pub fn new() -> Self {
		Self { head: None, len: 0 }
	}

	/// Returns a router that tries `route` first, then every route of
	/// `self`.
	pub fn with<F>(&self, route: Route, factory: F) -> Self
	where
		F: Fn(&C, &RouteArgs) -> D + Send + Sync + 'static,
	{
		Self {
			head: Some(Arc::new(Entry {
				route,
				factory: Arc::new(factory),
				next: self.head.clone(),
			})),
			len: self.len + 1,
		}
	}

	/// Resolves a location.
	///
	/// Runs the factory of the first matching route. A location that no
	/// route matches yields `None`.
	pub fn route(&self, location: &LocationInfo, ctx: &C) -> Option<RouteMatch<D>> {
		let mut entry = self.head.as_deref();
		while let Some(current) = entry {
			if let Some(args) = current.route.matches(location) {
				tracing::debug!(
					location = %location,
					pattern = %current.route.pattern(),
					"route matched"
				);
				let data = (current.factory)(ctx, &args);
				return Some(RouteMatch {
					route: current.route.clone(),
					args,
					data,
				});
			}
			entry = current.next.as_deref();
		}

		tracing::debug!(location = %location, "no route matched");
		None
	}

	/// Iterates over the routes in the order they are tried.
	pub fn routes(&self) -> impl Iterator<Item = &Route> + '_ {
		std::iter::successors(self.head.as_deref(), |entry| entry.next.as_deref())
			.map(|entry| &entry.route)
	}

	/// Number of registered routes.
	pub fn len(&self) -> usize {
		self.len
	}

	/// Returns whether no route is registered.
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}
}

impl<D, C> Default for Router<D, C> {
	fn default() -> Self {
		Self::new()
	}
}

impl<D, C> Clone for Router<D, C> {
	fn clone(&self) -> Self {
		Self {
			head: self.head.clone(),
			len: self.len,
		}
	}
}

impl<D, C> fmt::Debug for Router<D, C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Router")
			.field(
				"routes",
				&self
					.routes()
					.map(|route| route.pattern().pattern())
					.collect::<Vec<_>>(),
			)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::routers::client_router::{ArgKind, Args, QueryKind};
	use rstest::{fixture, rstest};

	#[derive(Debug, Clone, PartialEq)]
	enum Page {
		Timeline,
		Bucket(String),
		Lap(f64),
	}

	#[fixture]
	fn router() -> Router<Page> {
		Router::new()
			.with(Route::fixed("/timeline"), |_, _| Page::Timeline)
			.with(
				Route::new("/buckets/:id", [("id", ArgKind::String)]),
				|_, args| Page::Bucket(args.path.get_str("id").unwrap_or_default().to_string()),
			)
			.with(
				Route::new("/stopwatch/lap/:index", [("index", ArgKind::Number)]),
				|_, args| Page::Lap(args.path.get_number("index").unwrap_or_default()),
			)
	}

	fn loc(url: &str) -> LocationInfo {
		LocationInfo::parse(url).unwrap()
	}

	#[rstest]
	#[case("/timeline", Page::Timeline)]
	#[case("/buckets/aw-watcher-afk", Page::Bucket("aw-watcher-afk".to_string()))]
	#[case("/stopwatch/lap/4", Page::Lap(4.0))]
	fn test_route_resolves(router: Router<Page>, #[case] url: &str, #[case] expected: Page) {
		assert_eq!(router.route(&loc(url), &()).unwrap().data, expected);
	}

	#[rstest]
	#[case::unknown("/does-not-exist")]
	#[case::root("/")]
	#[case::bad_number("/stopwatch/lap/first")]
	fn test_no_match_is_none(router: Router<Page>, #[case] url: &str) {
		assert!(router.route(&loc(url), &()).is_none());
	}

	#[rstest]
	fn test_empty_router() {
		let router: Router<Page> = Router::new();
		assert!(router.is_empty());
		assert!(router.route(&LocationInfo::root(), &()).is_none());
	}

	#[rstest]
	fn test_later_route_wins() {
		let base: Router<&str> = Router::new();

		let router = base
			.with(Route::new("/:id", [("id", ArgKind::String)]), |_, _| "a")
			.with(Route::fixed("/users"), |_, _| "b");

		assert_eq!(router.route(&loc("/users"), &()).unwrap().data, "b");
		assert_eq!(router.route(&loc("/alice"), &()).unwrap().data, "a");
	}

	#[rstest]
	fn test_with_shares_and_preserves_base(router: Router<Page>) {
		let extended = router.with(Route::fixed("/timeline"), |_, _| Page::Lap(0.0));

		assert_eq!(router.len(), 3);
		assert_eq!(extended.len(), 4);
		assert_eq!(
			router.route(&loc("/timeline"), &()).unwrap().data,
			Page::Timeline
		);
		assert_eq!(
			extended.route(&loc("/timeline"), &()).unwrap().data,
			Page::Lap(0.0)
		);
	}

	#[rstest]
	fn test_routes_in_precedence_order(router: Router<Page>) {
		let patterns: Vec<&str> = router.routes().map(|r| r.pattern().pattern()).collect();
		assert_eq!(
			patterns,
			vec!["/stopwatch/lap/:index", "/buckets/:id", "/timeline"]
		);
	}

	#[rstest]
	fn test_factory_receives_context_and_args() {
		struct Ctx {
			default_server: &'static str,
		}
		let route = Route::fixed("/plot").with_query_args([("server", QueryKind::String)]);
		let router: Router<String, Ctx> = Router::new().with(route, |ctx: &Ctx, args| {
			args.query
				.get_str("server")
				.unwrap_or(ctx.default_server)
				.to_string()
		});
		let ctx = Ctx {
			default_server: "local",
		};

		let matched = router.route(&loc("/plot?server=remote"), &ctx).unwrap();
		let fallback = router.route(&loc("/plot"), &ctx).unwrap();

		assert_eq!(matched.data, "remote");
		assert_eq!(matched.args.query, Args::new().with("server", "remote"));
		assert_eq!(fallback.data, "local");
	}
}
