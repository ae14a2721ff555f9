//! # Arcade Core Runtime
//!
//! The orchestrator that ties the plugin system together: it owns the
//! active display and the active game, drives the single-threaded tick
//! loop, translates backend-native input into the uniform event stream,
//! and executes live plugin swaps without restarting the process.
//!
//! ## Tick Contract
//!
//! Each iteration performs exactly one bounded-timeout poll, at most one
//! game update, and at most one render, in that order. A successful update
//! is always followed by its render - swaps and quit are intercepted
//! before the update so games never observe the control events.
//!
//! ## Swap Protocol
//!
//! Cycling requests load and validate the replacement plugin before the
//! previous instance is torn down, so a failed swap leaves the session
//! exactly as it was. Cycling is circular; reaching the end of the catalog
//! wraps around and is never an error.

pub mod error;
pub mod menu;
pub mod runtime;
pub mod scores;
pub mod translate;

pub use error::{CoreError, StartupError, SwapError};
pub use runtime::{Runtime, RuntimeConfig, State};
pub use translate::{ControlBindings, Translator};
