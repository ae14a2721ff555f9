//! Command-line interface handling for the arcade platform.
//!
//! Argument parsing is done with the `clap` builder API; everything here
//! can override the corresponding setting from the configuration file.

use clap::{Arg, Command};
use std::path::PathBuf;

/// Command line arguments parsed from user input.
#[derive(Debug, Clone)]
pub struct CliArgs {
    /// Path to the configuration file
    pub config_path: PathBuf,
    /// Display library to activate at startup (first catalog entry when
    /// omitted)
    pub display: Option<PathBuf>,
    /// Optional override for the plugin directory
    pub plugin_dir: Option<PathBuf>,
    /// Optional override for log level
    pub log_level: Option<String>,
    /// Whether to force JSON log output
    pub json_logs: bool,
}

impl CliArgs {
    /// Parses command line arguments using clap.
    pub fn parse() -> Self {
        let matches = Command::new("Arcade")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Pluggable arcade platform with hot-swappable display and game plugins")
            .arg(
                Arg::new("display")
                    .value_name("DISPLAY_LIB")
                    .help("Path to the display library to start with (e.g. plugins/libterminal.so)"),
            )
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .help("Configuration file path")
                    .default_value("arcade.toml"),
            )
            .arg(
                Arg::new("plugins")
                    .short('p')
                    .long("plugins")
                    .value_name("DIR")
                    .help("Plugin directory path"),
            )
            .arg(
                Arg::new("log-level")
                    .short('l')
                    .long("log-level")
                    .value_name("LEVEL")
                    .help("Log level (trace, debug, info, warn, error)"),
            )
            .arg(
                Arg::new("json-logs")
                    .long("json-logs")
                    .help("Output logs in JSON format")
                    .action(clap::ArgAction::SetTrue),
            )
            .get_matches();

        Self {
            config_path: PathBuf::from(
                matches
                    .get_one::<String>("config")
                    .expect("Default config path should always be set"),
            ),
            display: matches.get_one::<String>("display").map(PathBuf::from),
            plugin_dir: matches.get_one::<String>("plugins").map(PathBuf::from),
            log_level: matches.get_one::<String>("log-level").cloned(),
            json_logs: matches.get_flag("json-logs"),
        }
    }
}
