//! Typed route declarations.
//!
//! A [`Route`] pairs a compiled [`RoutePattern`] with the kinds of its
//! positional placeholders and of the query parameters it recognizes. Routes
//! are immutable and cheap to clone; composing query schemas produces a new
//! route.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::args::{ArgKind, ArgValue, Args, QueryArgs, QueryKind, RouteArgs};
use super::error::{Result, RoutingError};
use super::location::LocationInfo;
use super::pattern::RoutePattern;

struct RouteInner {
	pattern: RoutePattern,
	args: BTreeMap<String, ArgKind>,
	query: BTreeMap<String, QueryKind>,
}

/// A navigable route with typed positional and query arguments.
#[derive(Clone)]
pub struct Route {
	inner: Arc<RouteInner>,
}

fn collect_schema<I, K, V>(schema: I) -> Result<BTreeMap<String, V>>
where
	I: IntoIterator<Item = (K, V)>,
	K: Into<String>,
{
	let mut collected = BTreeMap::new();
	for (key, kind) in schema {
		let key = key.into();
		if collected.contains_key(&key) {
			return Err(RoutingError::SchemaCollision { key });
		}
		collected.insert(key, kind);
	}
	Ok(collected)
}

/// Numeric placeholders only take [`ArgValue::Number`], so what the built
/// segment matches back to is what the caller passed.
fn encode_arg(name: &str, kind: ArgKind, value: &ArgValue) -> Result<String> {
	let param = value.to_param();
	let fits = match (kind, value) {
		(ArgKind::Number, ArgValue::Number(_)) => kind.decode(&param).is_some(),
		(ArgKind::Number, _) => false,
		(ArgKind::String, _) => !param.is_empty(),
	};
	if !fits {
		return Err(RoutingError::ArgumentType {
			name: name.to_string(),
			expected: kind.name(),
			value: param,
		});
	}
	Ok(param)
}

impl Route {
	/// Declares a route.
	///
	/// `args` lists the kind of every placeholder in `pattern`.
	///
	/// # Errors
	///
	/// - [`RoutingError::InvalidPattern`] if the pattern does not compile
	/// - [`RoutingError::SchemaCollision`] if `args` names a placeholder twice
	/// - [`RoutingError::SchemaMismatch`] if the placeholders and `args`
	///   differ
	pub fn try_new<I, K>(pattern: &str, args: I) -> Result<Self>
	where
		I: IntoIterator<Item = (K, ArgKind)>,
		K: Into<String>,
	{
		let compiled = RoutePattern::new(pattern)?;
		let args = collect_schema(args)?;

		let mut placeholders = compiled.param_names().to_vec();
		placeholders.sort();
		let declared: Vec<String> = args.keys().cloned().collect();
		if placeholders != declared {
			return Err(RoutingError::SchemaMismatch {
				pattern: pattern.to_string(),
				placeholders,
				declared,
			});
		}

		Ok(Self {
			inner: Arc::new(RouteInner {
				pattern: compiled,
				args,
				query: BTreeMap::new(),
			}),
		})
	}

	/// Declares a route.
	///
	/// # Panics
	///
	/// Panics if the declaration is invalid. Use [`Route::try_new`] for
	/// fallible construction.
	pub fn new<I, K>(pattern: &str, args: I) -> Self
	where
		I: IntoIterator<Item = (K, ArgKind)>,
		K: Into<String>,
	{
		Self::try_new(pattern, args)
			.unwrap_or_else(|e| panic!("Invalid route '{}': {}", pattern, e))
	}

	/// Declares a route without placeholders.
	///
	/// # Panics
	///
	/// Panics if the pattern is invalid or has placeholders.
	pub fn fixed(pattern: &str) -> Self {
		Self::new(pattern, std::iter::empty::<(String, ArgKind)>())
	}

	/// Returns a route that also recognizes the query parameters in `schema`.
	///
	/// # Errors
	///
	/// Returns [`RoutingError::SchemaCollision`] if a key is already declared,
	/// as a query parameter or as a positional argument.
	pub fn try_with_query_args<I, K>(&self, schema: I) -> Result<Self>
	where
		I: IntoIterator<Item = (K, QueryKind)>,
		K: Into<String>,
	{
		let mut query = self.inner.query.clone();
		for (key, kind) in collect_schema(schema)? {
			if query.contains_key(&key) || self.inner.args.contains_key(&key) {
				return Err(RoutingError::SchemaCollision { key });
			}
			query.insert(key, kind);
		}

		Ok(Self {
			inner: Arc::new(RouteInner {
				pattern: self.inner.pattern.clone(),
				args: self.inner.args.clone(),
				query,
			}),
		})
	}

	/// Returns a route that also recognizes the query parameters in `schema`.
	///
	/// # Panics
	///
	/// Panics on a schema collision. Use [`Route::try_with_query_args`] for
	/// fallible composition.
	pub fn with_query_args<I, K>(&self, schema: I) -> Self
	where
		I: IntoIterator<Item = (K, QueryKind)>,
		K: Into<String>,
	{
		self.try_with_query_args(schema).unwrap_or_else(|e| {
			panic!(
				"Invalid query schema for route '{}': {}",
				self.inner.pattern, e
			)
		})
	}

	/// Matches a location.
	///
	/// Returns `None` if the path does not fit the pattern, or if a numeric
	/// placeholder holds something other than a finite number. Declared query
	/// parameters that are absent or undecodable are left out of the result;
	/// undeclared ones are ignored.
	pub fn matches(&self, location: &LocationInfo) -> Option<RouteArgs> {
		let captures = self.inner.pattern.captures(location.path())?;

		let mut path = Args::new();
		for (name, raw) in captures {
			let kind = self.inner.args.get(name)?;
			path.insert(name, kind.decode(raw)?);
		}

		let query = self
			.inner
			.query
			.iter()
			.filter_map(|(key, kind)| {
				let value = kind.decode(location.query(key)?)?;
				Some((key.clone(), value))
			})
			.collect();

		Some(RouteArgs { path, query })
	}

	/// Builds the location for `args` and `query`.
	///
	/// Unset query values are omitted. Nothing is inherited here; see
	/// `Routing::location_info` for that.
	///
	/// # Errors
	///
	/// - [`RoutingError::MissingArgument`] if a placeholder has no value
	/// - [`RoutingError::ArgumentType`] if a value does not fit its
	///   placeholder, such as text for a number or an empty string
	pub fn build(&self, args: &Args, query: &QueryArgs) -> Result<LocationInfo> {
		let segments = self.inner.pattern.reverse(|name| {
			let value = args.get(name).ok_or_else(|| RoutingError::MissingArgument {
				pattern: self.inner.pattern.pattern().to_string(),
				name: name.to_string(),
			})?;
			let kind = self.inner.args.get(name).copied().unwrap_or(ArgKind::String);
			encode_arg(name, kind, value)
		})?;

		let search = query
			.values()
			.map(|(key, value)| (key.clone(), value.to_param()))
			.collect();

		Ok(LocationInfo::from_segments(segments).with_search(search))
	}

	/// The compiled pattern.
	pub fn pattern(&self) -> &RoutePattern {
		&self.inner.pattern
	}

	/// Kinds of the positional placeholders.
	pub fn arg_schema(&self) -> &BTreeMap<String, ArgKind> {
		&self.inner.args
	}

	/// Kinds of the recognized query parameters.
	pub fn query_schema(&self) -> &BTreeMap<String, QueryKind> {
		&self.inner.query
	}

	/// Returns whether `key` is a recognized query parameter.
	pub fn declares_query(&self, key: &str) -> bool {
		self.inner.query.contains_key(key)
	}
}

impl PartialEq for Route {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.inner, &other.inner)
			|| (self.inner.pattern == other.inner.pattern
				&& self.inner.args == other.inner.args
				&& self.inner.query == other.inner.query)
	}
}

impl fmt::Debug for Route {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Route")
			.field("pattern", &self.inner.pattern.pattern())
			.field("args", &self.inner.args)
			.field("query", &self.inner.query)
			.finish()
	}
}
