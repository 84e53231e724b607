//! Typed route arguments.
//!
//! A route declares the kind of each positional placeholder ([`ArgKind`])
//! and of each recognized query parameter ([`QueryKind`]). Matched and
//! supplied values are [`ArgValue`]s collected in [`Args`] / [`QueryArgs`].
//! [`RouteArgs::decode`] turns a match into any `serde` type.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{Result, RoutingError};

/// Largest integer an `f64` represents exactly (2^53).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

fn parse_number(raw: &str) -> Option<f64> {
	raw.trim()
		.parse::<f64>()
		.ok()
		.filter(|number| number.is_finite())
}

fn parse_bool(raw: &str) -> Option<bool> {
	match raw {
		"true" | "1" => Some(true),
		"false" | "0" => Some(false),
		_ => None,
	}
}

/// Decoding type of a positional placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgKind {
	/// Any non-empty segment.
	String,
	/// A finite number.
	Number,
}

impl ArgKind {
	/// Name used in error messages.
	pub fn name(self) -> &'static str {
		match self {
			Self::String => "string",
			Self::Number => "number",
		}
	}

	/// Decodes a raw segment; `None` means the segment does not fit.
	pub fn decode(self, raw: &str) -> Option<ArgValue> {
		match self {
			Self::String => Some(ArgValue::String(raw.to_string())),
			Self::Number => parse_number(raw).map(ArgValue::Number),
		}
	}
}

/// Decoding type of a query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
	/// Any value.
	String,
	/// A finite number.
	Number,
	/// `true`/`1` or `false`/`0`.
	Boolean,
}

impl QueryKind {
	/// Name used in error messages.
	pub fn name(self) -> &'static str {
		match self {
			Self::String => "string",
			Self::Number => "number",
			Self::Boolean => "boolean",
		}
	}

	/// Decodes a raw query value; `None` means the value does not fit.
	pub fn decode(self, raw: &str) -> Option<ArgValue> {
		match self {
			Self::String => Some(ArgValue::String(raw.to_string())),
			Self::Number => parse_number(raw).map(ArgValue::Number),
			Self::Boolean => parse_bool(raw).map(ArgValue::Boolean),
		}
	}
}

/// A single decoded argument value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
	/// Boolean query flag.
	Boolean(bool),
	/// Numeric argument.
	Number(f64),
	/// Textual argument.
	String(String),
}

impl ArgValue {
	/// Returns the string, if this is a string value.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(value) => Some(value),
			_ => None,
		}
	}

	/// Returns the number, if this is a numeric value.
	pub fn as_number(&self) -> Option<f64> {
		match self {
			Self::Number(value) => Some(*value),
			_ => None,
		}
	}

	/// Returns the flag, if this is a boolean value.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Boolean(value) => Some(*value),
			_ => None,
		}
	}

	/// The value as it appears in a URL (before percent-encoding).
	pub fn to_param(&self) -> String {
		match self {
			Self::String(value) => value.clone(),
			Self::Number(value) => value.to_string(),
			Self::Boolean(value) => value.to_string(),
		}
	}

	/// Integral numbers become JSON integers so they deserialize into
	/// integer fields.
	fn to_json(&self) -> Value {
		match self {
			Self::String(value) => Value::String(value.clone()),
			Self::Boolean(value) => Value::Bool(*value),
			Self::Number(value) if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER => {
				Value::from(*value as i64)
			}
			Self::Number(value) => serde_json::Number::from_f64(*value)
				.map(Value::Number)
				.unwrap_or(Value::Null),
		}
	}
}

impl fmt::Display for ArgValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_param())
	}
}

impl From<&str> for ArgValue {
	fn from(value: &str) -> Self {
		Self::String(value.to_string())
	}
}

impl From<String> for ArgValue {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}

impl From<bool> for ArgValue {
	fn from(value: bool) -> Self {
		Self::Boolean(value)
	}
}

macro_rules! impl_from_number {
	($($ty:ty),* $(,)?) => {
		$(
			impl From<$ty> for ArgValue {
				fn from(value: $ty) -> Self {
					Self::Number(value as f64)
				}
			}
		)*
	};
}

impl_from_number!(f64, f32, i32, i64, u32, u64, usize);

/// Named argument values, ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Args(BTreeMap<String, ArgValue>);

impl Args {
	/// Creates an empty argument set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns a copy with `name` set to `value`.
	pub fn with(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
		self.insert(name, value);
		self
	}

	/// Sets `name` to `value`, returning the previous value.
	pub fn insert(
		&mut self,
		name: impl Into<String>,
		value: impl Into<ArgValue>,
	) -> Option<ArgValue> {
		self.0.insert(name.into(), value.into())
	}

	/// Returns the value of `name`.
	pub fn get(&self, name: &str) -> Option<&ArgValue> {
		self.0.get(name)
	}

	/// Returns the value of `name` if it is a string.
	pub fn get_str(&self, name: &str) -> Option<&str> {
		self.get(name).and_then(ArgValue::as_str)
	}

	/// Returns the value of `name` if it is a number.
	pub fn get_number(&self, name: &str) -> Option<f64> {
		self.get(name).and_then(ArgValue::as_number)
	}

	/// Returns the value of `name` if it is a boolean.
	pub fn get_bool(&self, name: &str) -> Option<bool> {
		self.get(name).and_then(ArgValue::as_bool)
	}

	/// Returns whether `name` has a value.
	pub fn contains(&self, name: &str) -> bool {
		self.0.contains_key(name)
	}

	/// Number of values.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns whether there are no values.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterates over `(name, value)` pairs in name order.
	pub fn iter(&self) -> impl Iterator<Item = (&String, &ArgValue)> {
		self.0.iter()
	}
}

impl<K, V> FromIterator<(K, V)> for Args
where
	K: Into<String>,
	V: Into<ArgValue>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self(
			iter.into_iter()
				.map(|(name, value)| (name.into(), value.into()))
				.collect(),
		)
	}
}

/// Query arguments supplied to `Route::build` and `Routing::push`.
///
/// Each key is either set to a value or explicitly unset. An unset key is
/// left out of the URL and is *not* inherited from the current location;
/// a key that is simply absent may be inherited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryArgs(BTreeMap<String, Option<ArgValue>>);

impl QueryArgs {
	/// Creates an empty set: every declared key may be inherited.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns a copy with `key` set to `value`.
	pub fn with(mut self, key: impl Into<String>, value: impl Into<ArgValue>) -> Self {
		self.set(key, value);
		self
	}

	/// Returns a copy with `key` explicitly unset.
	pub fn unset(mut self, key: impl Into<String>) -> Self {
		self.0.insert(key.into(), None);
		self
	}

	/// Sets `key` to `value`.
	pub fn set(&mut self, key: impl Into<String>, value: impl Into<ArgValue>) {
		self.0.insert(key.into(), Some(value.into()));
	}

	/// Returns whether the caller said anything about `key`, set or unset.
	pub fn is_specified(&self, key: &str) -> bool {
		self.0.contains_key(key)
	}

	/// Returns the value of `key`, if set.
	pub fn get(&self, key: &str) -> Option<&ArgValue> {
		self.0.get(key).and_then(Option::as_ref)
	}

	/// Iterates over the keys that carry a value.
	pub fn values(&self) -> impl Iterator<Item = (&String, &ArgValue)> {
		self.0
			.iter()
			.filter_map(|(key, value)| value.as_ref().map(|value| (key, value)))
	}
}

impl From<Args> for QueryArgs {
	fn from(args: Args) -> Self {
		Self(
			args.0
				.into_iter()
				.map(|(key, value)| (key, Some(value)))
				.collect(),
		)
	}
}

/// Arguments decoded from a matched location.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteArgs {
	/// Positional arguments, one per placeholder.
	pub path: Args,
	/// Declared query parameters that were present and decodable.
	pub query: Args,
}

impl RouteArgs {
	/// Looks a name up in the positional arguments, then in the query.
	pub fn get(&self, name: &str) -> Option<&ArgValue> {
		self.path.get(name).or_else(|| self.query.get(name))
	}

	/// Deserializes all arguments into `T`.
	///
	/// Positional and query arguments share one namespace (route
	/// construction rejects overlapping names). Absent query parameters are
	/// missing fields, so declare them as `Option` in `T`.
	///
	/// # Errors
	///
	/// Returns [`RoutingError::Decode`] if `T` does not accept the values.
	pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
		let object: serde_json::Map<String, Value> = self
			.query
			.iter()
			.chain(self.path.iter())
			.map(|(name, value)| (name.clone(), value.to_json()))
			.collect();

		serde_json::from_value(Value::Object(object))
			.map_err(|e| RoutingError::Decode(e.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case::integer("42", Some(42.0))]
	#[case::negative("-3.5", Some(-3.5))]
	#[case::padded(" 7 ", Some(7.0))]
	#[case::word("latest", None)]
	#[case::nan("NaN", None)]
	#[case::infinity("inf", None)]
	fn test_number_decoding(#[case] raw: &str, #[case] expected: Option<f64>) {
		assert_eq!(
			ArgKind::Number.decode(raw),
			expected.map(ArgValue::Number)
		);
		assert_eq!(
			QueryKind::Number.decode(raw),
			expected.map(ArgValue::Number)
		);
	}

	#[rstest]
	#[case("true", Some(true))]
	#[case("1", Some(true))]
	#[case("false", Some(false))]
	#[case("0", Some(false))]
	#[case("yes", None)]
	#[case("", None)]
	fn test_boolean_decoding(#[case] raw: &str, #[case] expected: Option<bool>) {
		assert_eq!(
			QueryKind::Boolean.decode(raw),
			expected.map(ArgValue::Boolean)
		);
	}

	#[rstest]
	#[case::integral(ArgValue::Number(42.0), "42")]
	#[case::fraction(ArgValue::Number(0.25), "0.25")]
	#[case::text(ArgValue::from("aw-watcher-afk"), "aw-watcher-afk")]
	#[case::flag(ArgValue::from(true), "true")]
	fn test_to_param(#[case] value: ArgValue, #[case] expected: &str) {
		assert_eq!(value.to_param(), expected);
		assert_eq!(value.to_string(), expected);
	}

	#[rstest]
	fn test_args_accessors() {
		let args = Args::new()
			.with("id", "aw-watcher-window")
			.with("year", 2024)
			.with("merge", false);

		assert_eq!(args.get_str("id"), Some("aw-watcher-window"));
		assert_eq!(args.get_number("year"), Some(2024.0));
		assert_eq!(args.get_bool("merge"), Some(false));
		assert_eq!(args.get_str("year"), None);
		assert_eq!(args.len(), 3);
	}

	#[rstest]
	fn test_query_args_set_and_unset() {
		let query = QueryArgs::new().with("server", "foo").unset("start");

		assert!(query.is_specified("server"));
		assert!(query.is_specified("start"));
		assert!(!query.is_specified("end"));
		assert_eq!(query.get("start"), None);
		assert_eq!(query.values().count(), 1);
	}

	#[rstest]
	fn test_route_args_decode_typed() {
		#[derive(Debug, Deserialize, PartialEq)]
		struct Bucket {
			id: String,
			limit: u32,
			merge: Option<bool>,
			server: Option<String>,
		}

		let args = RouteArgs {
			path: Args::new().with("id", "aw-watcher-afk").with("limit", 100),
			query: Args::new().with("merge", true),
		};

		let bucket: Bucket = args.decode().unwrap();

		assert_eq!(
			bucket,
			Bucket {
				id: "aw-watcher-afk".to_string(),
				limit: 100,
				merge: Some(true),
				server: None,
			}
		);
	}

	#[rstest]
	fn test_route_args_decode_error() {
		#[derive(Debug, Deserialize)]
		#[allow(dead_code)]
		struct NeedsId {
			id: u32,
		}

		let args = RouteArgs {
			path: Args::new().with("id", "not-a-number"),
			query: Args::new(),
		};

		assert!(matches!(
			args.decode::<NeedsId>(),
			Err(RoutingError::Decode(_))
		));
	}
}
