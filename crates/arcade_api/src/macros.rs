//! # Plugin Export Macros
//!
//! These macros generate the FFI surface a plugin binary must export so the
//! core runtime can discover, validate, and instantiate it. A plugin crate
//! implements [`Display`](crate::Display) or [`Game`](crate::Game), provides
//! a `new()` constructor, and invokes exactly one of the macros:
//!
//! ```rust,ignore
//! use arcade_api::export_display_plugin;
//!
//! struct TerminalDisplay { /* ... */ }
//!
//! impl TerminalDisplay {
//!     fn new() -> Self { /* ... */ }
//! }
//!
//! impl arcade_api::Display for TerminalDisplay { /* ... */ }
//!
//! export_display_plugin!(TerminalDisplay, "terminal");
//! ```
//!
//! ## Generated Exports
//!
//! * `arcade_plugin_abi` - ABI version string for compatibility validation
//! * `arcade_plugin_kind` - raw [`PluginKind`](crate::PluginKind)
//!   discriminant, read by the registry without instantiation
//! * `arcade_plugin_name` - plugin name, read by the registry without
//!   instantiation
//! * `arcade_create_display` / `arcade_create_game` - the factory
//!
//! ## Safety Features
//!
//! The factory wraps construction in `catch_unwind` and returns null on
//! panic, so a misbehaving constructor cannot unwind across the FFI
//! boundary and crash the host.

/// Exports a [`Display`](crate::Display) implementation as a loadable
/// plugin.
///
/// The type must provide `fn new() -> Self`.
#[macro_export]
macro_rules! export_display_plugin {
    ($plugin_type:ty, $plugin_name:literal) => {
        $crate::export_plugin_metadata!($crate::PluginKind::Display, $plugin_name);

        /// Display factory - required export.
        ///
        /// Returns a raw pointer to a boxed trait object, or null if
        /// construction panicked. The host reclaims the box and keeps it
        /// alive no longer than the library mapping.
        #[no_mangle]
        pub unsafe extern "C" fn arcade_create_display() -> *mut dyn $crate::Display {
            match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                let instance: Box<dyn $crate::Display> = Box::new(<$plugin_type>::new());
                Box::into_raw(instance)
            })) {
                Ok(ptr) => ptr,
                Err(_) => {
                    eprintln!("arcade plugin '{}': display constructor panicked", $plugin_name);
                    std::ptr::null_mut::<$plugin_type>() as *mut dyn $crate::Display
                }
            }
        }
    };
}

/// Exports a [`Game`](crate::Game) implementation as a loadable plugin.
///
/// The type must provide `fn new() -> Self`.
#[macro_export]
macro_rules! export_game_plugin {
    ($plugin_type:ty, $plugin_name:literal) => {
        $crate::export_plugin_metadata!($crate::PluginKind::Game, $plugin_name);

        /// Game factory - required export.
        ///
        /// Returns a raw pointer to a boxed trait object, or null if
        /// construction panicked. The host reclaims the box and keeps it
        /// alive no longer than the library mapping.
        #[no_mangle]
        pub unsafe extern "C" fn arcade_create_game() -> *mut dyn $crate::Game {
            match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                let instance: Box<dyn $crate::Game> = Box::new(<$plugin_type>::new());
                Box::into_raw(instance)
            })) {
                Ok(ptr) => ptr,
                Err(_) => {
                    eprintln!("arcade plugin '{}': game constructor panicked", $plugin_name);
                    std::ptr::null_mut::<$plugin_type>() as *mut dyn $crate::Game
                }
            }
        }
    };
}

/// Shared metadata exports. Internal; invoked by the two public macros.
#[doc(hidden)]
#[macro_export]
macro_rules! export_plugin_metadata {
    ($kind:expr, $plugin_name:literal) => {
        /// ABI version export - validated by the loader before the factory
        /// is ever resolved. Static NUL-terminated string.
        #[no_mangle]
        pub unsafe extern "C" fn arcade_plugin_abi() -> *const std::os::raw::c_char {
            $crate::ABI_VERSION_C.as_ptr() as *const std::os::raw::c_char
        }

        /// Plugin kind export - lets the registry categorize the binary
        /// without instantiating anything.
        #[no_mangle]
        pub unsafe extern "C" fn arcade_plugin_kind() -> u32 {
            ($kind).as_raw()
        }

        /// Plugin name export. Null-terminated static string.
        #[no_mangle]
        pub unsafe extern "C" fn arcade_plugin_name() -> *const std::os::raw::c_char {
            concat!($plugin_name, "\0").as_ptr() as *const std::os::raw::c_char
        }
    };
}
