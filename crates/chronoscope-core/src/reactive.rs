//! Reactive primitives.
//!
//! ## Architecture
//!
//! The model is push-to-invalidate, pull-to-compute:
//!
//! 1. **Signal**: owns a value and a subscriber list. Every `set()` or
//!    `update()` notifies all subscribers exactly once.
//! 2. **Memo**: subscribes to a source signal. A notification only marks the
//!    cached value stale and forwards the notification; the value is
//!    recomputed on the next `get()`.
//! 3. **Subscription**: guard returned by `subscribe()`. Dropping it detaches
//!    the callback.
//!
//! There is no global runtime and no automatic dependency tracking: every
//! dependency is wired explicitly, so independent reactive graphs (for
//! example one per test) never interfere with each other.
//!
//! ## Example
//!
//! ```
//! use chronoscope_core::reactive::{Memo, Signal};
//!
//! let count = Signal::new(2);
//! let doubled = Memo::new(&count, |n| n * 2);
//! assert_eq!(*doubled.get(), 4);
//!
//! count.set(21);
//! assert_eq!(*doubled.get(), 42);
//! ```

pub mod memo;
pub mod signal;
pub mod subscription;

pub use memo::Memo;
pub use signal::Signal;
pub use subscription::{NodeId, Subscription};
