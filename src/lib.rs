//! # Chronoscope
//!
//! Typed routing and location synchronization for the Chronoscope activity
//! dashboard.
//!
//! ## Crates
//!
//! - `chronoscope-core`: reactive primitives ([`Signal`], [`Memo`])
//! - `chronoscope-urls`: locations, history backends, routes, the router
//!   and the routing engine
//!
//! This facade re-exports both and adds the dashboard's own route table in
//! [`dashboard`].
//!
//! ## Quick Example
//!
//! ```
//! use chronoscope::dashboard::{
//!     DashboardContext, DashboardPage, DashboardRoutes, mount_with_history,
//! };
//! use chronoscope::prelude::*;
//!
//! let routes = DashboardRoutes::new();
//! let history = MemoryHistory::at("/timeline?server=remote").unwrap();
//! let routing = mount_with_history(
//!     &routes,
//!     history,
//!     &RoutingConfig::default(),
//!     DashboardContext::default(),
//! )
//! .unwrap();
//!
//! routing
//!     .push(&routes.stopwatch, &Args::new(), &QueryArgs::new())
//!     .unwrap();
//!
//! let current = routing.current();
//! let screen = current.data().unwrap();
//! assert_eq!(screen.page, DashboardPage::Stopwatch);
//! assert_eq!(screen.server, "remote");
//! ```

pub mod dashboard;
pub mod reactive;
pub mod urls;

pub use chronoscope_core::reactive::{Memo, Signal, Subscription};
pub use chronoscope_urls::routers::client_router::{
	CurrentRoute, LocationInfo, LocationService, Route, Router, Routing, RoutingConfig,
	RoutingError,
};

/// Commonly used types.
pub mod prelude {
	pub use crate::dashboard::{DashboardPage, DashboardRoutes, Screen};
	pub use chronoscope_core::reactive::{Memo, Signal, Subscription};
	pub use chronoscope_urls::prelude::*;
}
