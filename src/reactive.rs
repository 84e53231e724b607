//! Reactive primitives
//!
//! A [`Signal`] holds the current value and notifies subscribers on every
//! write; a [`Memo`] derives a value from a signal and recomputes it on the
//! first read after a change.

// Re-export all chronoscope-core reactive functionality
pub use chronoscope_core::reactive::*;
