//! Error types for the plugin system.

use std::path::PathBuf;
use thiserror::Error;

/// Errors opening and validating a plugin binary.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Plugin file not found: {0}")]
    NotFound(PathBuf),

    #[error("Not a loadable plugin binary: {0}")]
    BadImage(String),

    #[error("Plugin does not export '{symbol}': {reason}")]
    MissingSymbol { symbol: String, reason: String },

    #[error("Plugin ABI mismatch: plugin reports '{plugin}', host expects '{expected}'")]
    AbiMismatch { plugin: String, expected: String },

    #[error("Plugin returned invalid metadata: {0}")]
    BadMetadata(String),

    #[error("Instantiation failed: {0}")]
    Instantiation(#[from] InstantiationError),
}

/// Errors creating an instance from an already-loaded plugin.
#[derive(Error, Debug)]
pub enum InstantiationError {
    #[error("Plugin '{name}' is a {actual} plugin, expected a {expected} plugin")]
    WrongKind {
        name: String,
        actual: arcade_api::PluginKind,
        expected: arcade_api::PluginKind,
    },

    #[error("Plugin '{name}' does not export the '{symbol}' factory: {reason}")]
    MissingFactory {
        name: String,
        symbol: String,
        reason: String,
    },

    #[error("Plugin '{name}' factory returned a null instance")]
    NullInstance { name: String },

    #[error("Plugin '{name}' was already unloaded")]
    Unloaded { name: String },
}

/// Errors scanning the plugin directory.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Plugin path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
