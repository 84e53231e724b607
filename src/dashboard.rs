//! The dashboard's route table
//!
//! Every page of the dashboard is declared here once, as a typed [`Route`]:
//!
//! - `/` - Home
//! - `/timeline` - Timeline (`duration` in seconds)
//! - `/activity/:host` - Activity for one host (`start`, `end`)
//! - `/buckets` - Bucket list
//! - `/buckets/:id` - Bucket detail (`limit`)
//! - `/query` - Query explorer (`q`)
//! - `/plot` - Plot (`start`, `end`)
//! - `/stopwatch` - Stopwatch
//! - `/settings` - Settings
//! - `/trends/:host` - Trends for one host
//!
//! All routes also declare the `server` query parameter, so navigating
//! between pages keeps the selected server.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use chronoscope_urls::routers::client_router::{
	ArgKind, History, LocationService, QueryKind, Result, Route, RouteArgs, Router, Routing,
	RoutingConfig,
};

/// Server used when the location does not name one.
pub const DEFAULT_SERVER: &str = "localhost:5600";

/// Date range shared by the activity and plot pages.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DateRange {
	/// Inclusive start, as written in the URL.
	pub start: Option<String>,
	/// Exclusive end, as written in the URL.
	pub end: Option<String>,
}

#[derive(Deserialize)]
struct ActivityParams {
	host: String,
	#[serde(flatten)]
	range: DateRange,
}

#[derive(Deserialize)]
struct BucketParams {
	id: String,
	limit: Option<u32>,
}

/// Dashboard page enum
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardPage {
	/// Home page
	Home,
	/// Timeline page
	Timeline {
		/// Span shown, in seconds.
		duration: Option<f64>,
	},
	/// Activity page for one host
	Activity {
		/// Host whose activity is shown.
		host: String,
		/// Period shown.
		range: DateRange,
	},
	/// Bucket list page
	Buckets,
	/// Bucket detail page
	Bucket {
		/// Bucket identifier.
		id: String,
		/// Maximum number of events listed.
		limit: Option<u32>,
	},
	/// Query explorer page
	QueryExplorer {
		/// Query text to prefill.
		query: Option<String>,
	},
	/// Plot page
	Plot {
		/// Period plotted.
		range: DateRange,
	},
	/// Stopwatch page
	Stopwatch,
	/// Settings page
	Settings,
	/// Trends page for one host
	Trends {
		/// Host whose trends are shown.
		host: String,
	},
	/// A route matched but its arguments did not decode
	InvalidArguments(String),
}

/// What the dashboard shows: a page and the server it reads from.
#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
	/// The page.
	pub page: DashboardPage,
	/// Server the page talks to.
	pub server: String,
}

/// Context handed to the dashboard's route factories.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardContext {
	/// Server used when the location has no `server` parameter.
	pub default_server: String,
}

impl Default for DashboardContext {
	fn default() -> Self {
		Self {
			default_server: DEFAULT_SERVER.to_string(),
		}
	}
}

/// The dashboard's routes.
#[derive(Debug, Clone)]
pub struct DashboardRoutes {
	/// `/`
	pub home: Route,
	/// `/timeline`, with `duration`.
	pub timeline: Route,
	/// `/activity/:host`, with `start` and `end`.
	pub activity: Route,
	/// `/buckets`
	pub buckets: Route,
	/// `/buckets/:id`, with `limit`.
	pub bucket: Route,
	/// `/query`, with `q`.
	pub query: Route,
	/// `/plot`, with `start` and `end`.
	pub plot: Route,
	/// `/stopwatch`
	pub stopwatch: Route,
	/// `/settings`
	pub settings: Route,
	/// `/trends/:host`
	pub trends: Route,
}

fn page_route(route: Route) -> Route {
	route.with_query_args([("server", QueryKind::String)])
}

fn range_query() -> [(&'static str, QueryKind); 2] {
	[("start", QueryKind::String), ("end", QueryKind::String)]
}

fn screen(ctx: &DashboardContext, args: &RouteArgs, page: DashboardPage) -> Screen {
	Screen {
		page,
		server: args
			.query
			.get_str("server")
			.map_or_else(|| ctx.default_server.clone(), str::to_string),
	}
}

fn decoded<T, F>(args: &RouteArgs, page: F) -> DashboardPage
where
	T: DeserializeOwned,
	F: FnOnce(T) -> DashboardPage,
{
	match args.decode::<T>() {
		Ok(params) => page(params),
		Err(e) => {
			tracing::warn!(error = %e, "route arguments did not decode");
			DashboardPage::InvalidArguments(e.to_string())
		}
	}
}

impl DashboardRoutes {
	/// Declares every dashboard route.
	pub fn new() -> Self {
		let host = [("host", ArgKind::String)];
		Self {
			home: page_route(Route::fixed("/")),
			timeline: page_route(Route::fixed("/timeline"))
				.with_query_args([("duration", QueryKind::Number)]),
			activity: page_route(Route::new("/activity/:host", host))
				.with_query_args(range_query()),
			buckets: page_route(Route::fixed("/buckets")),
			bucket: page_route(Route::new("/buckets/:id", [("id", ArgKind::String)]))
				.with_query_args([("limit", QueryKind::Number)]),
			query: page_route(Route::fixed("/query")).with_query_args([("q", QueryKind::String)]),
			plot: page_route(Route::fixed("/plot")).with_query_args(range_query()),
			stopwatch: page_route(Route::fixed("/stopwatch")),
			settings: page_route(Route::fixed("/settings")),
			trends: page_route(Route::new("/trends/:host", host)),
		}
	}

	/// Builds the router resolving every dashboard route to a [`Screen`].
	pub fn router(&self) -> Router<Screen, DashboardContext> {
		Router::new()
			.with(self.home.clone(), |ctx, args| screen(ctx, args, DashboardPage::Home))
			.with(self.timeline.clone(), |ctx, args| {
				let duration = args.query.get_number("duration");
				screen(ctx, args, DashboardPage::Timeline { duration })
			})
			.with(self.activity.clone(), |ctx, args| {
				let page = decoded(args, |p: ActivityParams| DashboardPage::Activity {
					host: p.host,
					range: p.range,
				});
				screen(ctx, args, page)
			})
			.with(self.buckets.clone(), |ctx, args| {
				screen(ctx, args, DashboardPage::Buckets)
			})
			.with(self.bucket.clone(), |ctx, args| {
				let page = decoded(args, |p: BucketParams| DashboardPage::Bucket {
					id: p.id,
					limit: p.limit,
				});
				screen(ctx, args, page)
			})
			.with(self.query.clone(), |ctx, args| {
				let query = args.query.get_str("q").map(str::to_string);
				screen(ctx, args, DashboardPage::QueryExplorer { query })
			})
			.with(self.plot.clone(), |ctx, args| {
				let page = decoded(args, |range: DateRange| DashboardPage::Plot { range });
				screen(ctx, args, page)
			})
			.with(self.stopwatch.clone(), |ctx, args| {
				screen(ctx, args, DashboardPage::Stopwatch)
			})
			.with(self.settings.clone(), |ctx, args| {
				screen(ctx, args, DashboardPage::Settings)
			})
			.with(self.trends.clone(), |ctx, args| {
				let host = args.path.get_str("host").unwrap_or_default().to_string();
				screen(ctx, args, DashboardPage::Trends { host })
			})
	}
}

impl Default for DashboardRoutes {
	fn default() -> Self {
		Self::new()
	}
}

/// Mounts the dashboard on the browser's history.
///
/// # Errors
///
/// Returns [`RoutingError::HistoryUnavailable`](crate::urls::RoutingError::HistoryUnavailable)
/// outside a browser, or a configuration error.
pub fn mount(
	routes: &DashboardRoutes,
	config: &RoutingConfig,
	context: DashboardContext,
) -> Result<Routing<Screen, DashboardContext>> {
	let location = LocationService::browser(config)?;
	tracing::debug!(base_path = %config.base_path, "dashboard mounted");
	Ok(Routing::with_context(routes.router(), location, context))
}

/// Mounts the dashboard on any history backend.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the history cannot
/// be read.
pub fn mount_with_history<H>(
	routes: &DashboardRoutes,
	history: H,
	config: &RoutingConfig,
	context: DashboardContext,
) -> Result<Routing<Screen, DashboardContext>>
where
	H: History + 'static,
{
	let location = LocationService::new(history, config)?;
	Ok(Routing::with_context(routes.router(), location, context))
}
