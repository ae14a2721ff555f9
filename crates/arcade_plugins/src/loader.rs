//! Library loader: owning handles over plugin binaries and typed
//! instantiation of the capability contracts.

use crate::error::{InstantiationError, LoadError};
use crate::registry::LibInfo;
use arcade_api::{Display, Game, PluginKind};
use libloading::{Library, Symbol};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Longest metadata string a plugin may return. Anything unterminated
/// within this bound is rejected as invalid metadata.
const MAX_METADATA_LENGTH: usize = 1024;

/// An owning handle over a loaded plugin binary.
///
/// Loading validates the plugin's ABI version and reads its kind and name
/// before any factory is touched. Dropping (or explicitly [`unload`]ing)
/// the handle unmaps the binary; instances created from it are bundled
/// with the handle in [`DisplayPlugin`] / [`GamePlugin`] so they can never
/// outlive it.
///
/// [`unload`]: PluginHandle::unload
pub struct PluginHandle {
    name: String,
    kind: PluginKind,
    path: PathBuf,
    library: Option<Library>,
}

impl PluginHandle {
    /// Opens a plugin binary and validates it.
    ///
    /// # Errors
    ///
    /// * [`LoadError::NotFound`] - the file does not exist
    /// * [`LoadError::BadImage`] - present but not a loadable binary
    /// * [`LoadError::MissingSymbol`] - a required metadata export is absent
    /// * [`LoadError::AbiMismatch`] - built against a different toolchain
    /// * [`LoadError::BadMetadata`] - metadata export returned garbage
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }

        let library = unsafe {
            Library::new(path).map_err(|e| LoadError::BadImage(e.to_string()))?
        };

        let abi = unsafe { read_string_export(&library, arcade_api::ABI_SYMBOL)? };
        if abi != arcade_api::ABI_VERSION {
            return Err(LoadError::AbiMismatch {
                plugin: abi,
                expected: arcade_api::ABI_VERSION.to_string(),
            });
        }

        let kind_fn: Symbol<unsafe extern "C" fn() -> u32> = unsafe {
            library
                .get(arcade_api::KIND_SYMBOL)
                .map_err(|e| missing_symbol(arcade_api::KIND_SYMBOL, e))?
        };
        let raw_kind = unsafe { kind_fn() };
        let kind = PluginKind::from_raw(raw_kind).ok_or_else(|| {
            LoadError::BadMetadata(format!("unknown plugin kind discriminant {raw_kind}"))
        })?;

        let name = unsafe { read_string_export(&library, arcade_api::NAME_SYMBOL)? };

        debug!("🔎 Validated plugin '{}' ({}) at {}", name, kind, path.display());

        Ok(Self {
            name,
            kind,
            path: path.to_path_buf(),
            library: Some(library),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> PluginKind {
        self.kind
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the binary is still mapped.
    pub fn is_loaded(&self) -> bool {
        self.library.is_some()
    }

    /// Unmaps the binary. Calling this on an already-unloaded handle is a
    /// no-op, never an error, which keeps error-path cleanup trivial.
    pub fn unload(&mut self) {
        if let Some(library) = self.library.take() {
            debug!("📤 Unloading plugin '{}' from {}", self.name, self.path.display());
            drop(library);
        }
    }

    /// Creates the display instance this plugin advertises, consuming the
    /// handle into the returned bundle.
    pub fn instantiate_display(self) -> Result<DisplayPlugin, InstantiationError> {
        let instance = self.instantiate::<dyn Display>(
            PluginKind::Display,
            arcade_api::DISPLAY_FACTORY_SYMBOL,
        )?;
        Ok(DisplayPlugin { instance, handle: Some(self) })
    }

    /// Creates the game instance this plugin advertises, consuming the
    /// handle into the returned bundle.
    pub fn instantiate_game(self) -> Result<GamePlugin, InstantiationError> {
        let instance = self.instantiate::<dyn Game>(
            PluginKind::Game,
            arcade_api::GAME_FACTORY_SYMBOL,
        )?;
        Ok(GamePlugin { instance, handle: Some(self) })
    }

    fn instantiate<T: ?Sized>(
        &self,
        expected: PluginKind,
        factory_symbol: &[u8],
    ) -> Result<Box<T>, InstantiationError> {
        if self.kind != expected {
            return Err(InstantiationError::WrongKind {
                name: self.name.clone(),
                actual: self.kind,
                expected,
            });
        }

        let library = self.library.as_ref().ok_or_else(|| InstantiationError::Unloaded {
            name: self.name.clone(),
        })?;

        let factory: Symbol<unsafe extern "C" fn() -> *mut T> = unsafe {
            library.get(factory_symbol).map_err(|e| InstantiationError::MissingFactory {
                name: self.name.clone(),
                symbol: String::from_utf8_lossy(factory_symbol).into_owned(),
                reason: e.to_string(),
            })?
        };

        let raw = unsafe { factory() };
        if raw.is_null() {
            return Err(InstantiationError::NullInstance { name: self.name.clone() });
        }

        // The factory transferred ownership of a Box allocated in the
        // plugin. Both sides share the toolchain (enforced by the ABI
        // check), so reclaiming it here is sound.
        Ok(unsafe { Box::from_raw(raw) })
    }
}

impl std::fmt::Debug for PluginHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginHandle")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("path", &self.path)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

/// An active display instance bundled with the handle that produced it.
pub struct DisplayPlugin {
    // Field order is load-bearing: the instance drops before the mapping
    // that holds its code.
    instance: Box<dyn Display>,
    handle: Option<PluginHandle>,
}

impl DisplayPlugin {
    /// Wraps a statically linked display with no backing plugin binary.
    pub fn builtin(instance: Box<dyn Display>) -> Self {
        Self { instance, handle: None }
    }

    /// Path of the backing binary, if any.
    pub fn path(&self) -> Option<&Path> {
        self.handle.as_ref().map(|h| h.path())
    }

    pub fn is_builtin(&self) -> bool {
        self.handle.is_none()
    }
}

impl std::ops::Deref for DisplayPlugin {
    type Target = dyn Display;

    fn deref(&self) -> &Self::Target {
        self.instance.as_ref()
    }
}

impl std::ops::DerefMut for DisplayPlugin {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.instance.as_mut()
    }
}

/// An active game instance bundled with the handle that produced it.
pub struct GamePlugin {
    // Same drop-order rule as DisplayPlugin.
    instance: Box<dyn Game>,
    handle: Option<PluginHandle>,
}

impl GamePlugin {
    /// Wraps a statically linked game with no backing plugin binary (used
    /// for the emergency menu).
    pub fn builtin(instance: Box<dyn Game>) -> Self {
        Self { instance, handle: None }
    }

    /// Path of the backing binary, if any.
    pub fn path(&self) -> Option<&Path> {
        self.handle.as_ref().map(|h| h.path())
    }

    pub fn is_builtin(&self) -> bool {
        self.handle.is_none()
    }
}

impl std::ops::Deref for GamePlugin {
    type Target = dyn Game;

    fn deref(&self) -> &Self::Target {
        self.instance.as_ref()
    }
}

impl std::ops::DerefMut for GamePlugin {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.instance.as_mut()
    }
}

/// Seam between the runtime and the loading mechanism.
///
/// The production implementation is [`DynamicLoader`]; tests substitute an
/// in-process source so orchestration logic can be exercised without any
/// shared-library artifacts.
pub trait PluginSource {
    fn load_display(&self, info: &LibInfo) -> Result<DisplayPlugin, LoadError>;
    fn load_game(&self, info: &LibInfo) -> Result<GamePlugin, LoadError>;
}

/// Loads plugins from their shared-library binaries.
#[derive(Debug, Default)]
pub struct DynamicLoader;

impl DynamicLoader {
    pub fn new() -> Self {
        Self
    }
}

impl PluginSource for DynamicLoader {
    fn load_display(&self, info: &LibInfo) -> Result<DisplayPlugin, LoadError> {
        let handle = PluginHandle::load(&info.path)?;
        Ok(handle.instantiate_display()?)
    }

    fn load_game(&self, info: &LibInfo) -> Result<GamePlugin, LoadError> {
        let handle = PluginHandle::load(&info.path)?;
        Ok(handle.instantiate_game()?)
    }
}

fn missing_symbol(symbol: &[u8], err: libloading::Error) -> LoadError {
    LoadError::MissingSymbol {
        symbol: String::from_utf8_lossy(symbol).into_owned(),
        reason: err.to_string(),
    }
}

/// Resolves a `fn() -> *const c_char` export and copies the string out.
unsafe fn read_string_export(library: &Library, symbol: &[u8]) -> Result<String, LoadError> {
    let getter: Symbol<unsafe extern "C" fn() -> *const std::os::raw::c_char> =
        library.get(symbol).map_err(|e| missing_symbol(symbol, e))?;

    let ptr = getter();
    if ptr.is_null() {
        return Err(LoadError::BadMetadata(format!(
            "'{}' returned a null string",
            String::from_utf8_lossy(symbol)
        )));
    }

    copy_bounded_string(ptr).ok_or_else(|| {
        LoadError::BadMetadata(format!(
            "'{}' returned an unterminated string",
            String::from_utf8_lossy(symbol)
        ))
    })
}

/// Copies a NUL-terminated string out of plugin memory, one byte at a
/// time. Reads never go past the terminator, and anything unterminated
/// within [`MAX_METADATA_LENGTH`] bytes yields `None`.
unsafe fn copy_bounded_string(ptr: *const std::os::raw::c_char) -> Option<String> {
    let mut bytes = Vec::new();
    for i in 0..MAX_METADATA_LENGTH {
        let byte = ptr.add(i).read() as u8;
        if byte == 0 {
            return Some(String::from_utf8_lossy(&bytes).into_owned());
        }
        bytes.push(byte);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_missing_file_is_not_found() {
        let err = PluginHandle::load("/nonexistent/arcade_nope.so").unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }

    #[test]
    fn load_garbage_file_is_bad_image() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("libgarbage.so");
        let mut file = std::fs::File::create(&path).expect("create garbage file");
        file.write_all(b"definitely not an ELF image").expect("write");
        drop(file);

        let err = PluginHandle::load(&path).unwrap_err();
        assert!(matches!(err, LoadError::BadImage(_)));
    }

    #[test]
    fn metadata_copy_stops_at_the_terminator() {
        let export = std::ffi::CString::new("terminal").expect("cstring");
        let copied = unsafe { copy_bounded_string(export.as_ptr()) };
        assert_eq!(copied.as_deref(), Some("terminal"));
    }

    #[test]
    fn empty_metadata_is_an_empty_string() {
        let export = std::ffi::CString::new("").expect("cstring");
        let copied = unsafe { copy_bounded_string(export.as_ptr()) };
        assert_eq!(copied.as_deref(), Some(""));
    }

    #[test]
    fn unterminated_metadata_is_rejected() {
        // Twice the bound, no NUL anywhere: the scan must give up at the
        // bound instead of running on
        let junk = vec![b'x'; MAX_METADATA_LENGTH * 2];
        let copied = unsafe { copy_bounded_string(junk.as_ptr() as *const _) };
        assert!(copied.is_none());
    }

    #[test]
    fn builtin_plugins_have_no_backing_path() {
        struct NullGame;
        impl Game for NullGame {
            fn init(&mut self) {}
            fn update(&mut self, _event: &arcade_api::Event) -> arcade_api::UpdateOutcome {
                arcade_api::UpdateOutcome::Continue
            }
            fn render(&mut self, _display: &mut dyn Display) {}
            fn is_over(&self) -> bool {
                false
            }
            fn score(&self) -> arcade_api::Score {
                arcade_api::Score::new(0.0, "nobody")
            }
            fn name(&self) -> &str {
                "null"
            }
        }

        let plugin = GamePlugin::builtin(Box::new(NullGame));
        assert!(plugin.is_builtin());
        assert!(plugin.path().is_none());
        assert_eq!(plugin.name(), "null");
    }
}
