//! # Arcade Plugin API
//!
//! Shared contracts between the arcade core runtime and its plugins. Both
//! sides of the dynamic-library boundary link this crate: the core loads
//! plugins through the factory symbols declared here, and plugins implement
//! the [`Display`] or [`Game`] capability trait and export themselves with
//! the [`export_display_plugin!`] / [`export_game_plugin!`] macros.
//!
//! ## Capability Contracts
//!
//! * [`Display`] - a rendering backend: open/close a surface, draw cells
//!   and text, present frames, and poll native input with a bounded timeout
//! * [`Game`] - a game module: consume translated [`Event`]s, render
//!   through whichever display is currently active, report game over
//!
//! ## Event Model
//!
//! Displays produce backend-native [`RawEvent`]s; the core translates them
//! into the uniform [`Event`] stream games consume. Games never see which
//! backend produced an event.
//!
//! ## ABI Compatibility
//!
//! Plugins are Rust dylibs sharing the host's toolchain. Every plugin
//! exports [`ABI_VERSION`] and the loader refuses anything compiled against
//! a different crate or compiler version before touching the factory.

pub mod display;
pub mod error;
pub mod events;
pub mod game;
pub mod macros;
pub mod types;

pub use display::Display;
pub use error::PluginError;
pub use events::{Event, Key, MouseButton, RawEvent};
pub use game::{Game, UpdateOutcome};
pub use types::{Cell, Color, PluginKind, Position, Score, TextStyle};

/// Symbol every plugin exports with its ABI version string.
pub const ABI_SYMBOL: &[u8] = b"arcade_plugin_abi";
/// Symbol reporting the plugin kind without instantiating it.
pub const KIND_SYMBOL: &[u8] = b"arcade_plugin_kind";
/// Symbol reporting the plugin name without instantiating it.
pub const NAME_SYMBOL: &[u8] = b"arcade_plugin_name";
/// Factory symbol exported by display plugins.
pub const DISPLAY_FACTORY_SYMBOL: &[u8] = b"arcade_create_display";
/// Factory symbol exported by game plugins.
pub const GAME_FACTORY_SYMBOL: &[u8] = b"arcade_create_game";

/// ABI version for plugin compatibility validation.
/// Derived from the crate version and the Rust compiler version so plugins
/// built against a different toolchain report a different ABI.
/// Format: "major.minor.patch:rust_version", e.g. "0.3.0:1.75.0".
pub const ABI_VERSION: &str = {
    const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");

    // Set by build.rs after probing the actual compiler
    const RUST_VERSION: &str = env!("ARCADE_RUSTC_VERSION");

    const_format::concatcp!(CRATE_VERSION, ":", RUST_VERSION)
};

/// [`ABI_VERSION`] with a trailing NUL, the form the `arcade_plugin_abi`
/// export hands across the FFI boundary.
#[doc(hidden)]
pub const ABI_VERSION_C: &str = const_format::concatcp!(ABI_VERSION, "\0");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abi_export_string_is_nul_terminated() {
        assert!(ABI_VERSION_C.ends_with('\0'));
        assert_eq!(&ABI_VERSION_C[..ABI_VERSION_C.len() - 1], ABI_VERSION);
    }
}
