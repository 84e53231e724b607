//! Routers.
//!
//! Only the client-side router lives here; the dashboard has no server-side
//! routing.

pub mod client_router;

pub use client_router::{Route, Router, Routing};
