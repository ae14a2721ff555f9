//! Configuration management for the arcade platform.
//!
//! This module handles loading, validation, and conversion of platform
//! configuration from TOML files and command-line arguments.

use arcade_core::{ControlBindings, RuntimeConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Default poll timeout for serde deserialization
fn default_tick_timeout() -> u64 {
    50 // 20 ticks per second
}

fn default_score_directory() -> String {
    "scores".to_string()
}

/// Application configuration loaded from TOML file.
///
/// This is the main configuration structure that encompasses all platform
/// settings including plugins, the tick loop, control bindings, and logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Plugin configuration settings
    pub plugins: PluginSettings,
    /// Tick loop configuration settings
    #[serde(default)]
    pub runtime: RuntimeSettings,
    /// Reserved control keys for hot-swapping and quitting
    #[serde(default)]
    pub controls: ControlBindings,
    /// Logging configuration settings
    pub logging: LoggingSettings,
}

/// Plugin system configuration.
///
/// Controls where display and game libraries are discovered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginSettings {
    /// Directory path where plugin files are located
    pub directory: String,
}

/// Tick loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeSettings {
    /// Maximum time a single event poll may block, in milliseconds
    #[serde(default = "default_tick_timeout")]
    pub tick_timeout_ms: u64,
    /// Directory where per-game score files are written
    #[serde(default = "default_score_directory")]
    pub score_directory: String,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            tick_timeout_ms: default_tick_timeout(),
            score_directory: default_score_directory(),
        }
    }
}

/// Logging system configuration.
///
/// Controls log output format, levels, and destination settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter (trace, debug, info, warn, error)
    pub level: String,
    /// Whether to output logs in JSON format
    pub json_format: bool,
    /// Optional file path for log output (None means stderr only)
    pub file_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            plugins: PluginSettings {
                directory: "plugins".to_string(),
            },
            runtime: RuntimeSettings::default(),
            controls: ControlBindings::default(),
            logging: LoggingSettings {
                level: "info".to_string(),
                json_format: false,
                file_path: None,
            },
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    ///
    /// If the file doesn't exist, creates a default configuration file at the
    /// specified path and returns the default configuration.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// The loaded or default configuration, or an error if loading/creation failed.
    pub fn load_from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: AppConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            // Create default config file
            let default_config = AppConfig::default();
            let toml_content = toml::to_string_pretty(&default_config)?;
            std::fs::write(path, toml_content)?;
            info!("Created default configuration file: {}", path.display());
            Ok(default_config)
        }
    }

    /// Converts the application configuration to a runtime configuration.
    ///
    /// # Arguments
    ///
    /// * `initial_display` - Display library requested on the command line,
    ///   if any
    pub fn to_runtime_config(&self, initial_display: Option<PathBuf>) -> RuntimeConfig {
        RuntimeConfig {
            tick_timeout: Duration::from_millis(self.runtime.tick_timeout_ms),
            bindings: self.controls.clone(),
            initial_display,
            score_directory: Some(PathBuf::from(&self.runtime.score_directory)),
        }
    }

    /// Validates the configuration for consistency and correctness.
    ///
    /// # Returns
    ///
    /// `Ok(())` if the configuration is valid, or an error string describing the issue.
    pub fn validate(&self) -> Result<(), String> {
        // Validate plugin directory
        if self.plugins.directory.is_empty() {
            return Err("Plugin directory cannot be empty".to_string());
        }

        // Validate tick timeout
        if self.runtime.tick_timeout_ms == 0 {
            return Err("runtime.tick_timeout_ms must be greater than 0".to_string());
        }

        // Validate score directory
        if self.runtime.score_directory.is_empty() {
            return Err("Score directory cannot be empty".to_string());
        }

        // Validate control bindings are pairwise distinct, otherwise one
        // swap action shadows another
        let keys = [
            self.controls.previous_display,
            self.controls.next_display,
            self.controls.previous_game,
            self.controls.next_game,
            self.controls.quit,
        ];
        for (i, a) in keys.iter().enumerate() {
            for b in keys.iter().skip(i + 1) {
                if a == b {
                    return Err(format!("Control binding {a:?} is assigned to two actions"));
                }
            }
        }

        // Validate log level
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(format!(
                "Invalid log level: {}. Must be one of: {valid_levels:?}",
                &self.logging.level
            ));
        }

        Ok(())
    }
}
