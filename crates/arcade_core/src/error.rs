//! Error taxonomy for the core runtime.
//!
//! Two severities exist: startup failures and failed swap reverts are
//! fatal (the process exits non-zero after teardown); a failed swap whose
//! revert succeeds is recoverable and never propagates out of the loop.

use arcade_api::{PluginError, PluginKind};
use arcade_plugins::LoadError;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error returned by the runtime.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Startup failed: {0}")]
    Startup(#[from] StartupError),

    #[error("Unrecoverable swap failure: {0}")]
    Swap(#[from] SwapError),
}

/// Fatal conditions preventing the loop from ever being entered.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("No display plugins found in the plugin directory")]
    NoDisplays,

    #[error("Requested display '{0}' is not in the plugin directory")]
    UnknownDisplay(PathBuf),

    #[error("Failed to load initial display '{path}': {source}")]
    DisplayLoad {
        path: PathBuf,
        #[source]
        source: LoadError,
    },

    #[error("Failed to open display '{name}': {source}")]
    DisplayOpen {
        name: String,
        #[source]
        source: PluginError,
    },
}

/// Swap failures.
///
/// `ReplacementFailed` is recoverable: the previous instance is still
/// active and the loop continues. `RevertFailed` means the previous
/// display surface could not be reacquired either, leaving the kind
/// without a usable instance - fatal.
#[derive(Error, Debug)]
pub enum SwapError {
    #[error("Replacement {kind} plugin '{name}' failed to load: {source}")]
    ReplacementFailed {
        kind: PluginKind,
        name: String,
        #[source]
        source: LoadError,
    },

    #[error("Replacement display '{name}' failed to open: {source}")]
    ReplacementOpenFailed {
        name: String,
        #[source]
        source: PluginError,
    },

    #[error("Display '{name}' could not be reopened after a failed swap: {source}")]
    RevertFailed {
        name: String,
        #[source]
        source: PluginError,
    },
}
