//! Client-side router.
//!
//! Data flows in a loop:
//!
//! 1. A [`History`] backend reports navigation (push, replace, back/forward).
//! 2. [`LocationService`] turns it into the current [`LocationInfo`].
//! 3. [`Routing`] resolves that location through its [`Router`] and exposes the
//!    result as a lazily recomputed [`CurrentRoute`].
//! 4. Views call [`Routing::push`] (or click a [`LinkHandler`]), which builds a
//!    new location with [`Route::build`] and hands it back to the
//!    [`LocationService`].
//!
//! ## Example
//!
//! ```
//! use chronoscope_urls::routers::client_router::{
//!     ArgKind, Args, LocationService, MemoryHistory, QueryArgs, QueryKind, Route, Router,
//!     Routing, RoutingConfig,
//! };
//!
//! let bucket = Route::new("/buckets/:id", [("id", ArgKind::String)])
//!     .with_query_args([("server", QueryKind::String)]);
//!
//! let router = Router::new().with(bucket.clone(), |_, args| {
//!     format!("bucket {}", args.path.get_str("id").unwrap_or_default())
//! });
//!
//! let history = MemoryHistory::at("/?server=remote").unwrap();
//! let location = LocationService::new(history, &RoutingConfig::default()).unwrap();
//! let routing = Routing::new(router, location);
//!
//! routing
//!     .push(&bucket, &Args::new().with("id", "aw-watcher-afk"), &QueryArgs::new())
//!     .unwrap();
//!
//! assert_eq!(
//!     routing.location_service().current().to_string(),
//!     "/buckets/aw-watcher-afk?server=remote"
//! );
//! assert_eq!(routing.current().data().map(String::as_str), Some("bucket aw-watcher-afk"));
//! ```

mod args;
#[cfg(target_arch = "wasm32")]
mod browser;
mod config;
mod error;
mod history;
mod link;
mod location;
mod pattern;
mod route;
mod router;
mod routing;
mod service;

pub use args::{ArgKind, ArgValue, Args, QueryArgs, QueryKind, RouteArgs};
#[cfg(target_arch = "wasm32")]
pub use browser::BrowserHistory;
pub use config::RoutingConfig;
pub use error::{Result, RoutingError};
pub use history::{History, HistoryListener, MemoryHistory, PopCallback};
pub use link::{ClickEvent, ClickHandler, LinkHandler, SyntheticClick};
pub use location::{LocationInfo, NavigationEntry, parse_path};
pub use pattern::RoutePattern;
pub use route::Route;
pub use router::{DataFactory, RouteMatch, Router};
pub use routing::{CurrentRoute, Routing};
pub use service::LocationService;
