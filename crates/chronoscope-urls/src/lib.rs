//! URL routing for the Chronoscope dashboard.
//!
//! This crate provides the client-side routing engine used by the dashboard:
//!
//! - [`LocationInfo`](routers::client_router::LocationInfo): a browser location
//!   decomposed into path segments, query map, fragment and history state
//! - [`LocationService`](routers::client_router::LocationService): the single
//!   reactive "current location" synchronized with navigation history
//! - [`Route`](routers::client_router::Route): typed path and query argument
//!   declarations that match and build locations
//! - [`Router`](routers::client_router::Router): an immutable, ordered route
//!   registry
//! - [`Routing`](routers::client_router::Routing): router + location service,
//!   exposing the current resolution and inheritance-aware navigation

pub mod routers;

pub mod prelude {
	pub use crate::routers::client_router::{
		ArgKind, ArgValue, Args, CurrentRoute, LinkHandler, LocationInfo, LocationService,
		MemoryHistory, QueryArgs, QueryKind, Route, RouteArgs, RouteMatch, Router, Routing,
		RoutingConfig, RoutingError,
	};
}
