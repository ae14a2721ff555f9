//! Error type surfaced by plugin implementations.

use thiserror::Error;

/// Errors a plugin can report through the capability traits.
#[derive(Error, Debug)]
pub enum PluginError {
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Initialization failed: {0}")]
    Initialization(String),

    #[error("Plugin runtime error: {0}")]
    Runtime(String),
}

impl PluginError {
    /// Wraps any error as a backend failure, the common case for display
    /// plugins bridging an external library.
    pub fn backend(err: impl std::fmt::Display) -> Self {
        PluginError::Backend(err.to_string())
    }
}
