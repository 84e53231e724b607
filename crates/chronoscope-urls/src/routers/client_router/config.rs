//! Routing configuration.
//!
//! ```toml
//! base_path = "/dashboard"
//! inherit_query = true
//! ```

use serde::{Deserialize, Serialize};

use super::error::{Result, RoutingError};
use super::location::parse_path;

/// Settings shared by the location service and the routing engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
	/// Prefix under which the application is mounted.
	///
	/// Stripped from locations read from the history and prepended to
	/// locations written to it.
	pub base_path: String,
	/// Whether navigation through a route copies the route's declared query
	/// parameters from the current location.
	pub inherit_query: bool,
}

impl Default for RoutingConfig {
	fn default() -> Self {
		Self {
			base_path: "/".to_string(),
			inherit_query: true,
		}
	}
}

impl RoutingConfig {
	/// Creates the default configuration.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the base path.
	pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
		self.base_path = base_path.into();
		self
	}

	/// Enables or disables query inheritance.
	pub fn with_inherit_query(mut self, inherit_query: bool) -> Self {
		self.inherit_query = inherit_query;
		self
	}

	/// Parses and validates a TOML document.
	///
	/// Missing keys take their default values.
	///
	/// # Errors
	///
	/// Returns [`RoutingError::Config`] if the document does not parse or the
	/// result fails [`RoutingConfig::validate`].
	pub fn from_toml_str(contents: &str) -> Result<Self> {
		let config: Self = toml::from_str(contents)
			.map_err(|e| RoutingError::Config(format!("TOML parse error: {}", e)))?;
		config.validate()?;
		Ok(config)
	}

	/// Checks that the base path is an absolute path without query or
	/// fragment.
	///
	/// # Errors
	///
	/// Returns [`RoutingError::Config`] describing the first problem found.
	pub fn validate(&self) -> Result<()> {
		if !self.base_path.starts_with('/') {
			return Err(RoutingError::Config(format!(
				"base_path {:?} must start with '/'",
				self.base_path
			)));
		}
		if self.base_path.contains(['?', '#']) {
			return Err(RoutingError::Config(format!(
				"base_path {:?} must not contain a query or fragment",
				self.base_path
			)));
		}
		Ok(())
	}

	/// Decoded segments of the base path; empty when mounted at `/`.
	///
	/// # Errors
	///
	/// Returns [`RoutingError::Config`] if the base path is invalid.
	pub fn base_segments(&self) -> Result<Vec<String>> {
		self.validate()?;
		parse_path(&self.base_path).map_err(|e| RoutingError::Config(e.to_string()))
	}
}
