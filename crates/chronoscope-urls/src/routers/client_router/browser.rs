//! Browser History API backend (wasm32 only).

use serde_json::Value;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;

use super::error::{Result, RoutingError};
use super::history::{History, HistoryListener, PopCallback};
use super::location::{LocationInfo, NavigationEntry};

/// `window.history` as a [`History`].
#[derive(Debug, Clone)]
pub struct BrowserHistory {
	window: web_sys::Window,
	history: web_sys::History,
}

fn js_error(context: &str, error: JsValue) -> RoutingError {
	RoutingError::Navigation(format!("{context}: {error:?}"))
}

fn state_to_json(state: JsValue) -> Value {
	if state.is_null() || state.is_undefined() {
		return Value::Null;
	}
	js_sys::JSON::stringify(&state)
		.ok()
		.and_then(|text| text.as_string())
		.and_then(|text| serde_json::from_str(&text).ok())
		.unwrap_or(Value::Null)
}

fn state_to_js(state: &Value) -> Result<JsValue> {
	if state.is_null() {
		return Ok(JsValue::NULL);
	}
	let text = serde_json::to_string(state).map_err(|e| RoutingError::Navigation(e.to_string()))?;
	js_sys::JSON::parse(&text).map_err(|e| js_error("history state", e))
}

fn read_location(window: &web_sys::Window, history: &web_sys::History) -> Result<LocationInfo> {
	let location = window.location();
	let entry = NavigationEntry {
		pathname: location.pathname().map_err(|e| js_error("pathname", e))?,
		search: location.search().map_err(|e| js_error("search", e))?,
		hash: location.hash().map_err(|e| js_error("hash", e))?,
		state: history.state().map(state_to_json).unwrap_or(Value::Null),
	};
	LocationInfo::from_navigation_entry(&entry)
}

impl BrowserHistory {
	/// Attaches to the current window.
	///
	/// # Errors
	///
	/// Returns [`RoutingError::HistoryUnavailable`] if there is no window or
	/// it exposes no history.
	pub fn new() -> Result<Self> {
		let window = web_sys::window()
			.ok_or_else(|| RoutingError::HistoryUnavailable("no global window".to_string()))?;
		let history = window
			.history()
			.map_err(|e| RoutingError::HistoryUnavailable(format!("{e:?}")))?;
		Ok(Self { window, history })
	}
}

impl History for BrowserHistory {
	fn location(&self) -> Result<LocationInfo> {
		read_location(&self.window, &self.history)
	}

	fn push(&self, location: &LocationInfo) -> Result<()> {
		self.history
			.push_state_with_url(&state_to_js(location.state())?, "", Some(&location.build()))
			.map_err(|e| js_error("pushState", e))
	}

	fn replace(&self, location: &LocationInfo) -> Result<()> {
		self.history
			.replace_state_with_url(&state_to_js(location.state())?, "", Some(&location.build()))
			.map_err(|e| js_error("replaceState", e))
	}

	fn back(&self) -> Result<()> {
		self.history.back().map_err(|e| js_error("back", e))
	}

	fn listen(&self, callback: PopCallback) -> Result<HistoryListener> {
		let window = self.window.clone();
		let history = self.history.clone();
		let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
			match read_location(&window, &history) {
				Ok(location) => {
					tracing::trace!(location = %location, "popstate");
					callback(location);
				}
				Err(e) => tracing::warn!(error = %e, "unreadable location after popstate"),
			}
		});

		self.window
			.add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref())
			.map_err(|e| js_error("addEventListener", e))?;

		let target = self.window.clone();
		Ok(HistoryListener::new(move || {
			let _ = target
				.remove_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
			drop(closure);
		}))
	}
}
