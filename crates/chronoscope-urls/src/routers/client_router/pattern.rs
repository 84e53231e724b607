//! Route pattern compilation.
//!
//! Patterns are slash-delimited templates such as `/buckets/:id/events`.
//! A segment starting with `:` is a named placeholder that captures exactly
//! one path segment; every other segment must match literally.
//!
//! Patterns are compiled once into a segment list so matching a location is
//! a single pass over its path segments.

use std::fmt;

use super::error::{Result, RoutingError};

/// Maximum allowed length for a route pattern string in bytes.
const MAX_PATTERN_LENGTH: usize = 1024;

/// Maximum allowed number of segments in a route pattern.
const MAX_PATTERN_SEGMENTS: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
	Literal(String),
	Param(String),
}

/// A compiled route pattern.
#[derive(Debug, Clone)]
pub struct RoutePattern {
	/// The original pattern string.
	pattern: String,
	segments: Vec<Segment>,
	/// Placeholder names in pattern order.
	param_names: Vec<String>,
}

fn invalid(pattern: &str, reason: impl Into<String>) -> RoutingError {
	RoutingError::InvalidPattern {
		pattern: pattern.to_string(),
		reason: reason.into(),
	}
}

fn is_valid_name(name: &str) -> bool {
	let mut chars = name.chars();
	chars
		.next()
		.is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
		&& chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl RoutePattern {
	/// Compiles a pattern.
	///
	/// Empty segments are ignored, so `/buckets/` and `/buckets` are the same
	/// pattern, and `/` matches only the root.
	///
	/// # Errors
	///
	/// Returns [`RoutingError::InvalidPattern`] if the pattern:
	/// - does not start with `/`
	/// - exceeds 1024 bytes or 32 segments
	/// - has a placeholder whose name is empty or not an identifier
	/// - uses the same placeholder name twice
	pub fn new(pattern: &str) -> Result<Self> {
		if pattern.len() > MAX_PATTERN_LENGTH {
			return Err(invalid(
				pattern,
				format!(
					"length {} exceeds maximum allowed length of {} bytes",
					pattern.len(),
					MAX_PATTERN_LENGTH
				),
			));
		}

		let body = pattern
			.strip_prefix('/')
			.ok_or_else(|| invalid(pattern, "patterns must start with '/'"))?;

		let mut segments = Vec::new();
		let mut param_names: Vec<String> = Vec::new();

		for raw in body.split('/').filter(|segment| !segment.is_empty()) {
			if segments.len() == MAX_PATTERN_SEGMENTS {
				return Err(invalid(
					pattern,
					format!("more than {MAX_PATTERN_SEGMENTS} segments"),
				));
			}

			match raw.strip_prefix(':') {
				Some(name) => {
					if !is_valid_name(name) {
						return Err(invalid(
							pattern,
							format!("placeholder ':{name}' is not a valid name"),
						));
					}
					if param_names.iter().any(|existing| existing == name) {
						return Err(invalid(
							pattern,
							format!("placeholder ':{name}' appears more than once"),
						));
					}
					param_names.push(name.to_string());
					segments.push(Segment::Param(name.to_string()));
				}
				None => segments.push(Segment::Literal(raw.to_string())),
			}
		}

		Ok(Self {
			pattern: pattern.to_string(),
			segments,
			param_names,
		})
	}

	/// Returns the original pattern string.
	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	/// Returns the placeholder names in pattern order.
	pub fn param_names(&self) -> &[String] {
		&self.param_names
	}

	/// Returns whether this pattern has no placeholders.
	pub fn is_exact(&self) -> bool {
		self.param_names.is_empty()
	}

	/// Number of segments a matching path has.
	pub fn segment_count(&self) -> usize {
		self.segments.len()
	}

	/// Matches decoded path segments.
	///
	/// Returns `(name, raw value)` pairs in pattern order, or `None` if the
	/// path has a different length or a literal segment differs.
	pub fn captures<'p>(&self, path: &'p [String]) -> Option<Vec<(&str, &'p str)>> {
		if path.len() != self.segments.len() {
			return None;
		}

		let mut captures = Vec::with_capacity(self.param_names.len());
		for (segment, value) in self.segments.iter().zip(path) {
			match segment {
				Segment::Literal(literal) if literal != value => return None,
				Segment::Literal(_) => {}
				Segment::Param(name) => captures.push((name.as_str(), value.as_str())),
			}
		}
		Some(captures)
	}

	/// Produces path segments, asking `value_of` for each placeholder.
	///
	/// # Errors
	///
	/// Propagates the first error returned by `value_of`.
	pub fn reverse<F>(&self, mut value_of: F) -> Result<Vec<String>>
	where
		F: FnMut(&str) -> Result<String>,
	{
		self.segments
			.iter()
			.map(|segment| match segment {
				Segment::Literal(literal) => Ok(literal.clone()),
				Segment::Param(name) => value_of(name),
			})
			.collect()
	}
}

impl PartialEq for RoutePattern {
	fn eq(&self, other: &Self) -> bool {
		self.segments == other.segments
	}
}

impl Eq for RoutePattern {}

impl fmt::Display for RoutePattern {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.pattern)
	}
}
