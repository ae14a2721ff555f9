//! Library registry: directory scanning and the ordered plugin catalogs
//! that back next/previous cycling.

use crate::error::RegistryError;
use crate::loader::PluginHandle;
use arcade_api::PluginKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Metadata for a discovered plugin, extracted without instantiating it.
///
/// Immutable once discovered; the registry rebuilds its records only on an
/// explicit rescan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibInfo {
    pub name: String,
    pub path: PathBuf,
    pub kind: PluginKind,
}

/// An ordered, circular catalog of plugins of one kind.
///
/// Ordering is lexicographic by path, fixed at scan time, so "next" and
/// "previous" are stable across runs and across machines with the same
/// directory contents. Cycling wraps at both ends and is never an error.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<LibInfo>,
}

impl Catalog {
    pub fn new(entries: Vec<LibInfo>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[LibInfo] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LibInfo> {
        self.entries.get(index)
    }

    /// Index after `current`, wrapping to the start. `None` on an empty
    /// catalog - there is nothing to cycle to.
    pub fn next_index(&self, current: usize) -> Option<usize> {
        if self.entries.is_empty() {
            return None;
        }
        Some((current + 1) % self.entries.len())
    }

    /// Index before `current`, wrapping to the end. `None` on an empty
    /// catalog.
    pub fn previous_index(&self, current: usize) -> Option<usize> {
        if self.entries.is_empty() {
            return None;
        }
        Some((current + self.entries.len() - 1) % self.entries.len())
    }

    /// Position of the entry backed by `path`, if present.
    pub fn position_of(&self, path: &Path) -> Option<usize> {
        self.entries.iter().position(|info| info.path == path)
    }
}

/// The result of scanning a plugin directory: one catalog per kind.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    displays: Catalog,
    games: Catalog,
}

impl Registry {
    /// Scans `directory` for plugin binaries and categorizes them.
    ///
    /// Every regular file with the platform's dynamic-library extension is
    /// probed by transiently loading it and reading its kind and name
    /// exports; the probe mapping is dropped immediately. Unreadable or
    /// ambiguous entries are skipped with a warning - a bad file never
    /// fails the scan as a whole. A missing directory yields an empty
    /// registry.
    pub fn scan<P: AsRef<Path>>(directory: P) -> Result<Self, RegistryError> {
        let dir_path = directory.as_ref();

        if !dir_path.exists() {
            warn!("Plugin directory does not exist: {}", dir_path.display());
            return Ok(Self::default());
        }

        if !dir_path.is_dir() {
            return Err(RegistryError::NotADirectory(dir_path.to_path_buf()));
        }

        let mut candidates = discover_plugin_files(dir_path)?;
        // Lexicographic order keeps next/previous cycling reproducible
        candidates.sort();

        let mut displays = Vec::new();
        let mut games = Vec::new();

        for path in candidates {
            match probe(&path) {
                Ok(info) => match info.kind {
                    PluginKind::Display => displays.push(info),
                    PluginKind::Game => games.push(info),
                },
                Err(e) => {
                    warn!("⚠️ Skipping {}: {}", path.display(), e);
                }
            }
        }

        info!(
            "📚 Plugin scan of {} found {} display(s), {} game(s)",
            dir_path.display(),
            displays.len(),
            games.len()
        );

        Ok(Self {
            displays: Catalog::new(displays),
            games: Catalog::new(games),
        })
    }

    /// Builds a registry from pre-assembled catalogs. Used by hosts that
    /// source plugins elsewhere (and by tests).
    pub fn from_catalogs(displays: Catalog, games: Catalog) -> Self {
        Self { displays, games }
    }

    pub fn displays(&self) -> &Catalog {
        &self.displays
    }

    pub fn games(&self) -> &Catalog {
        &self.games
    }
}

/// Collects regular files carrying the platform dylib extension.
fn discover_plugin_files(directory: &Path) -> Result<Vec<PathBuf>, RegistryError> {
    let mut plugin_files = Vec::new();

    for entry in std::fs::read_dir(directory)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_file() {
            if let Some(extension) = path.extension() {
                let ext_str = extension.to_string_lossy().to_lowercase();

                #[cfg(target_os = "windows")]
                let is_plugin = ext_str == "dll";

                #[cfg(target_os = "macos")]
                let is_plugin = ext_str == "dylib";

                #[cfg(not(any(target_os = "windows", target_os = "macos")))]
                let is_plugin = ext_str == "so";

                if is_plugin {
                    plugin_files.push(path);
                }
            }
        }
    }

    Ok(plugin_files)
}

/// Loads a candidate just long enough to read its metadata exports.
fn probe(path: &Path) -> Result<LibInfo, crate::error::LoadError> {
    let mut handle = PluginHandle::load(path)?;
    let info = LibInfo {
        name: handle.name().to_string(),
        path: path.to_path_buf(),
        kind: handle.kind(),
    };
    handle.unload();
    Ok(info)
}
