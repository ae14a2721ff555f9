//! # Arcade Plugin System
//!
//! Dynamic loading infrastructure for the arcade platform:
//!
//! * [`loader`] - opens a plugin binary, validates its ABI, and produces
//!   owning handles and typed [`Display`](arcade_api::Display) /
//!   [`Game`](arcade_api::Game) instances
//! * [`registry`] - scans the plugin directory into an ordered catalog of
//!   [`LibInfo`] records without instantiating anything
//!
//! The central lifetime rule: an instance created from a plugin binary
//! must never outlive the mapping of that binary. [`DisplayPlugin`] and
//! [`GamePlugin`] enforce it structurally by owning both the instance and
//! the handle, in that drop order.

pub mod error;
pub mod loader;
pub mod registry;

pub use error::{InstantiationError, LoadError, RegistryError};
pub use loader::{DisplayPlugin, DynamicLoader, GamePlugin, PluginHandle, PluginSource};
pub use registry::{Catalog, LibInfo, Registry};
