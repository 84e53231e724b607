//! Link click handling.
//!
//! A [`LinkHandler`] is what the rendering layer attaches to an anchor: the
//! `href` to render and an `on_click` callback that turns a plain primary
//! click into a client-side navigation. Clicks with a modifier key or a
//! non-primary button are left to the browser (open in new tab, etc.).

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// The parts of a click event a link handler looks at.
pub trait ClickEvent {
	/// Cancels the browser's default navigation.
	fn prevent_default(&self);

	/// Mouse button; 0 is the primary button.
	fn button(&self) -> i16 {
		0
	}

	/// Whether Ctrl, Meta, Shift or Alt was held.
	fn has_modifier(&self) -> bool {
		false
	}
}

#[cfg(target_arch = "wasm32")]
impl ClickEvent for web_sys::MouseEvent {
	fn prevent_default(&self) {
		web_sys::Event::prevent_default(self);
	}

	fn button(&self) -> i16 {
		web_sys::MouseEvent::button(self)
	}

	fn has_modifier(&self) -> bool {
		self.ctrl_key() || self.meta_key() || self.shift_key() || self.alt_key()
	}
}

/// A click produced outside a browser, for non-browser hosts and tests.
#[derive(Debug, Default)]
pub struct SyntheticClick {
	button: i16,
	modifier: bool,
	prevented: Cell<bool>,
}

impl SyntheticClick {
	/// A plain primary-button click.
	pub fn primary() -> Self {
		Self::default()
	}

	/// A primary-button click with a modifier key held.
	pub fn with_modifier() -> Self {
		Self {
			modifier: true,
			..Self::default()
		}
	}

	/// A click with the given button.
	pub fn with_button(button: i16) -> Self {
		Self {
			button,
			..Self::default()
		}
	}

	/// Whether a handler cancelled the default navigation.
	pub fn default_prevented(&self) -> bool {
		self.prevented.get()
	}
}

impl ClickEvent for SyntheticClick {
	fn prevent_default(&self) {
		self.prevented.set(true);
	}

	fn button(&self) -> i16 {
		self.button
	}

	fn has_modifier(&self) -> bool {
		self.modifier
	}
}

/// Callback attached to a link's click event.
pub type ClickHandler = Rc<dyn Fn(&dyn ClickEvent)>;

/// An `href` and the click handler that navigates to it.
#[derive(Clone)]
pub struct LinkHandler {
	href: String,
	on_click: ClickHandler,
}

impl LinkHandler {
	/// Creates a link handler.
	pub fn new(href: impl Into<String>, on_click: ClickHandler) -> Self {
		Self {
			href: href.into(),
			on_click,
		}
	}

	/// URL to render in the anchor's `href` attribute.
	pub fn href(&self) -> &str {
		&self.href
	}

	/// Runs the click handler.
	pub fn click(&self, event: &dyn ClickEvent) {
		(self.on_click)(event)
	}

	/// The click handler, for attaching to an event listener.
	pub fn on_click(&self) -> ClickHandler {
		Rc::clone(&self.on_click)
	}
}

impl fmt::Debug for LinkHandler {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LinkHandler")
			.field("href", &self.href)
			.finish_non_exhaustive()
	}
}

/// Whether a click should become a client-side navigation.
pub(crate) fn is_plain_click(event: &dyn ClickEvent) -> bool {
	event.button() == 0 && !event.has_modifier()
}
