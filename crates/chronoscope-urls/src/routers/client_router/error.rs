//! Error types for client-side routing.
//!
//! Construction-time errors (`InvalidPattern`, `SchemaMismatch`,
//! `SchemaCollision`, `MissingArgument`, `ArgumentType`) indicate a mistake in
//! the fixed route table. Resolving a location never produces an error: a
//! location that matches nothing is reported as "not found".

use thiserror::Error;

/// Error type for router operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
	/// A raw location string does not begin with `/`.
	#[error("Malformed path {0:?}: paths must start with '/'")]
	MalformedPath(String),
	/// An argument name is declared twice, or a query key shadows a
	/// positional argument.
	#[error("Argument '{key}' is already declared")]
	SchemaCollision {
		/// The colliding key.
		key: String,
	},
	/// `Route::build` was called without a positional argument.
	#[error("Missing argument '{name}' for route '{pattern}'")]
	MissingArgument {
		/// Pattern of the route being built.
		pattern: String,
		/// Name of the placeholder without a value.
		name: String,
	},
	/// A positional argument cannot be encoded as its declared kind.
	#[error("Argument '{name}' expects a {expected}, got {value:?}")]
	ArgumentType {
		/// Name of the placeholder.
		name: String,
		/// Declared kind.
		expected: &'static str,
		/// Offending value, as it would appear in the URL.
		value: String,
	},
	/// The route pattern cannot be compiled.
	#[error("Invalid route pattern '{pattern}': {reason}")]
	InvalidPattern {
		/// The pattern as written.
		pattern: String,
		/// Why it was rejected.
		reason: String,
	},
	/// Placeholders in the pattern and the argument schema disagree.
	#[error(
		"Route '{pattern}' declares placeholders {placeholders:?} but its argument schema lists {declared:?}"
	)]
	SchemaMismatch {
		/// The pattern as written.
		pattern: String,
		/// Placeholder names found in the pattern.
		placeholders: Vec<String>,
		/// Names listed in the argument schema.
		declared: Vec<String>,
	},
	/// No navigation history is available in this environment.
	#[error("Navigation history unavailable: {0}")]
	HistoryUnavailable(String),
	/// The history backend rejected a navigation.
	#[error("Navigation failed: {0}")]
	Navigation(String),
	/// Route arguments could not be decoded into the requested type.
	#[error("Failed to decode route arguments: {0}")]
	Decode(String),
	/// The routing configuration is invalid.
	#[error("Invalid routing configuration: {0}")]
	Config(String),
}

/// Result alias for routing operations.
pub type Result<T, E = RoutingError> = std::result::Result<T, E>;
