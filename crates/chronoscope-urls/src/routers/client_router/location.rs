//! Browser locations as plain values.
//!
//! A [`LocationInfo`] is what the router matches against. It is built from a
//! [`NavigationEntry`] (the raw pieces a history backend reports) or parsed
//! from a URL string, and turns back into a URL with [`LocationInfo::build`].
//!
//! Path segments are percent-decoded when parsed and percent-encoded when
//! built. The query string uses `application/x-www-form-urlencoded` rules.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{Result, RoutingError};

/// The raw pieces of a navigation-history entry.
///
/// `search` and `hash` may carry their leading `?` / `#`, the way
/// `window.location` reports them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigationEntry {
	/// Path part of the URL, starting with `/`.
	pub pathname: String,
	/// Query string, with or without the leading `?`.
	pub search: String,
	/// Fragment, with or without the leading `#`.
	pub hash: String,
	/// History state payload, `Null` when absent.
	pub state: Value,
}

/// An immutable, decomposed browser location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationInfo {
	path: Vec<String>,
	search: BTreeMap<String, String>,
	#[serde(default)]
	hash: String,
	#[serde(default)]
	state: Value,
}

/// Splits a raw path into decoded segments.
///
/// Empty segments are dropped, so `/`, `//` and the empty remainder all
/// denote the root.
///
/// # Errors
///
/// Returns [`RoutingError::MalformedPath`] if `raw` does not start with `/`.
pub fn parse_path(raw: &str) -> Result<Vec<String>> {
	let rest = raw
		.strip_prefix('/')
		.ok_or_else(|| RoutingError::MalformedPath(raw.to_string()))?;

	Ok(rest
		.split('/')
		.filter(|segment| !segment.is_empty())
		.map(decode_segment)
		.collect())
}

fn decode_segment(segment: &str) -> String {
	// Invalid UTF-8 escapes are kept verbatim rather than rejected
	urlencoding::decode(segment)
		.map(|decoded| decoded.into_owned())
		.unwrap_or_else(|_| segment.to_string())
}

fn parse_search(raw: &str) -> Result<BTreeMap<String, String>> {
	let raw = raw.strip_prefix('?').unwrap_or(raw);
	let pairs: Vec<(String, String)> = serde_urlencoded::from_str(raw)
		.map_err(|e| RoutingError::Decode(format!("query string {raw:?}: {e}")))?;

	// Later occurrences of a repeated key overwrite earlier ones
	Ok(pairs.into_iter().collect())
}

impl LocationInfo {
	/// The root location `/`.
	pub fn root() -> Self {
		Self::default()
	}

	/// Creates a location from already-decoded path segments.
	///
	/// Empty segments are dropped.
	pub fn from_segments<I, S>(segments: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			path: segments
				.into_iter()
				.map(Into::into)
				.filter(|segment: &String| !segment.is_empty())
				.collect(),
			..Self::default()
		}
	}

	/// Decomposes a navigation-history entry.
	///
	/// # Errors
	///
	/// Returns [`RoutingError::MalformedPath`] if `pathname` does not start
	/// with `/`.
	pub fn from_navigation_entry(entry: &NavigationEntry) -> Result<Self> {
		Ok(Self {
			path: parse_path(&entry.pathname)?,
			search: parse_search(&entry.search)?,
			hash: entry
				.hash
				.strip_prefix('#')
				.unwrap_or(&entry.hash)
				.to_string(),
			state: entry.state.clone(),
		})
	}

	/// Parses a URL of the form `/seg1/seg2?k=v#hash`.
	///
	/// The state is always `Null`: it is not part of the URL.
	///
	/// # Errors
	///
	/// Returns [`RoutingError::MalformedPath`] if `url` does not start with `/`.
	pub fn parse(url: &str) -> Result<Self> {
		let (rest, hash) = url.split_once('#').unwrap_or((url, ""));
		let (pathname, search) = rest.split_once('?').unwrap_or((rest, ""));

		Self::from_navigation_entry(&NavigationEntry {
			pathname: pathname.to_string(),
			search: search.to_string(),
			hash: hash.to_string(),
			state: Value::Null,
		})
	}

	/// Decoded path segments; empty for the root.
	pub fn path(&self) -> &[String] {
		&self.path
	}

	/// Query parameters.
	pub fn search(&self) -> &BTreeMap<String, String> {
		&self.search
	}

	/// Value of a single query parameter.
	pub fn query(&self, key: &str) -> Option<&str> {
		self.search.get(key).map(String::as_str)
	}

	/// Fragment without the leading `#`.
	pub fn hash(&self) -> &str {
		&self.hash
	}

	/// History state payload.
	pub fn state(&self) -> &Value {
		&self.state
	}

	/// Returns whether this is the root location.
	pub fn is_root(&self) -> bool {
		self.path.is_empty()
	}

	/// Renders the location as a URL string.
	pub fn build(&self) -> String {
		let mut url = String::from("/");
		let segments: Vec<_> = self
			.path
			.iter()
			.map(|segment| urlencoding::encode(segment))
			.collect();
		url.push_str(&segments.join("/"));

		if !self.search.is_empty() {
			let query: Vec<String> = self
				.search
				.iter()
				.map(|(key, value)| {
					format!(
						"{}={}",
						urlencoding::encode(key),
						urlencoding::encode(value)
					)
				})
				.collect();
			url.push('?');
			url.push_str(&query.join("&"));
		}

		if !self.hash.is_empty() {
			url.push('#');
			url.push_str(&self.hash);
		}

		url
	}

	/// Returns a copy with the path replaced by the parsed `raw` path.
	///
	/// # Errors
	///
	/// Returns [`RoutingError::MalformedPath`] if `raw` does not start with `/`.
	pub fn with_path(&self, raw: &str) -> Result<Self> {
		Ok(Self {
			path: parse_path(raw)?,
			..self.clone()
		})
	}

	/// Returns a copy with the path replaced by decoded segments.
	pub fn with_segments<I, S>(&self, segments: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			path: Self::from_segments(segments).path,
			..self.clone()
		}
	}

	/// Returns a copy whose query parameters are replaced wholesale.
	pub fn with_search(&self, search: BTreeMap<String, String>) -> Self {
		Self {
			search,
			..self.clone()
		}
	}

	/// Returns a copy with a different fragment.
	pub fn with_hash(&self, hash: impl Into<String>) -> Self {
		let hash = hash.into();
		Self {
			hash: hash.strip_prefix('#').map(str::to_string).unwrap_or(hash),
			..self.clone()
		}
	}

	/// Returns a copy carrying a history state payload.
	pub fn with_state(&self, state: Value) -> Self {
		Self {
			state,
			..self.clone()
		}
	}
}

impl fmt::Display for LocationInfo {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.build())
	}
}

impl std::str::FromStr for LocationInfo {
	type Err = RoutingError;

	fn from_str(s: &str) -> Result<Self> {
		Self::parse(s)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case::root("/", &[])]
	#[case::single("/timeline", &["timeline"])]
	#[case::trailing_slash("/buckets/", &["buckets"])]
	#[case::double_slash("/buckets//aw", &["buckets", "aw"])]
	#[case::encoded("/buckets/aw%20host%2Fx", &["buckets", "aw host/x"])]
	fn test_parse_path(#[case] raw: &str, #[case] expected: &[&str]) {
		assert_eq!(parse_path(raw).unwrap(), expected);
	}

	#[rstest]
	#[case::empty("")]
	#[case::relative("timeline")]
	#[case::query_only("?a=b")]
	fn test_parse_path_requires_leading_slash(#[case] raw: &str) {
		assert_eq!(
			parse_path(raw),
			Err(RoutingError::MalformedPath(raw.to_string()))
		);
	}

	#[rstest]
	fn test_from_navigation_entry() {
		// Arrange
		let entry = NavigationEntry {
			pathname: "/activity/laptop".to_string(),
			search: "?server=foo&start=2024-01-01".to_string(),
			hash: "#top".to_string(),
			state: json!({"scroll": 120}),
		};

		// Act
		let location = LocationInfo::from_navigation_entry(&entry).unwrap();

		// Assert
		assert_eq!(location.path(), ["activity", "laptop"]);
		assert_eq!(location.query("server"), Some("foo"));
		assert_eq!(location.query("start"), Some("2024-01-01"));
		assert_eq!(location.hash(), "top");
		assert_eq!(location.state(), &json!({"scroll": 120}));
	}

	#[rstest]
	fn test_repeated_query_key_last_wins() {
		let location = LocationInfo::parse("/plot?server=a&server=b").unwrap();
		assert_eq!(location.query("server"), Some("b"));
	}

	#[rstest]
	fn test_query_decoding() {
		let location = LocationInfo::parse("/query?q=a+b%26c&empty=").unwrap();
		assert_eq!(location.query("q"), Some("a b&c"));
		assert_eq!(location.query("empty"), Some(""));
	}

	#[rstest]
	#[case::root("/")]
	#[case::path("/buckets/aw-watcher-window")]
	#[case::query("/plot?server=foo")]
	#[case::hash("/timeline?duration=86400#end")]
	fn test_build_canonical_urls(#[case] url: &str) {
		assert_eq!(LocationInfo::parse(url).unwrap().build(), url);
	}

	#[rstest]
	fn test_build_encodes_segments_and_query() {
		let location = LocationInfo::from_segments(["buckets", "aw host/x"]).with_search(
			[("q".to_string(), "a b&c".to_string())]
				.into_iter()
				.collect(),
		);

		assert_eq!(location.build(), "/buckets/aw%20host%2Fx?q=a%20b%26c");
		assert_eq!(
			LocationInfo::parse(&location.build()).unwrap().path(),
			location.path()
		);
	}

	#[rstest]
	fn test_with_path_keeps_other_fields() {
		let location = LocationInfo::parse("/timeline?server=foo#h").unwrap();

		let moved = location.with_path("/plot/").unwrap();

		assert_eq!(moved.path(), ["plot"]);
		assert_eq!(moved.query("server"), Some("foo"));
		assert_eq!(moved.hash(), "h");
		assert!(location.with_path("plot").is_err());
	}

	#[rstest]
	fn test_with_search_replaces_wholesale() {
		let location = LocationInfo::parse("/plot?server=foo&start=1").unwrap();

		let replaced = location.with_search(
			[("end".to_string(), "2".to_string())]
				.into_iter()
				.collect(),
		);

		assert_eq!(replaced.query("server"), None);
		assert_eq!(replaced.query("start"), None);
		assert_eq!(replaced.query("end"), Some("2"));
	}

	#[rstest]
	fn test_serde_round_trip_keeps_all_fields() {
		let location = LocationInfo::parse("/stopwatch?server=foo#x")
			.unwrap()
			.with_state(json!({"nested": [1, 2, {"k": null}]}));

		let serialized = serde_json::to_string(&location).unwrap();
		let restored: LocationInfo = serde_json::from_str(&serialized).unwrap();

		assert_eq!(restored, location);
	}

	#[rstest]
	fn test_equality_includes_state() {
		let a = LocationInfo::parse("/").unwrap();
		let b = a.with_state(json!(1));
		assert_ne!(a, b);
	}

	#[rstest]
	fn test_from_segments_drops_empty() {
		let location = LocationInfo::from_segments(["", "a", ""]);
		assert_eq!(location.path(), ["a"]);
		assert!(LocationInfo::root().is_root());
	}
}
