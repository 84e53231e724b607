//! Client-side routing
//!
//! See [`chronoscope_urls::routers::client_router`] for the data flow between
//! history, location service, router and routing engine.

// Re-export all chronoscope-urls routing functionality
pub use chronoscope_urls::routers::client_router::*;
