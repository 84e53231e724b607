//! # Chronoscope Core
//!
//! Core building blocks shared by the Chronoscope dashboard crates.
//!
//! The [`reactive`] module provides a minimal "current value + subscribe"
//! reactivity model: a [`Signal`](reactive::Signal) is a mutable cell that
//! notifies subscribers on every write, and a [`Memo`](reactive::Memo) is a
//! derived value that is recomputed lazily, but synchronously, on the first
//! read after its source changed.
//!
//! Everything here is single-threaded (`Rc`/`RefCell` based) and intended to
//! run on the UI thread of a browser or a test harness.

pub mod reactive;

pub use reactive::{Memo, NodeId, Signal, Subscription};
