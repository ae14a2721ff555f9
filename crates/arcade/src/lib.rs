//! # Arcade Platform - Main Entry Point
//!
//! Pluggable arcade platform with hot-swappable display backends and game
//! plugins. This entry point handles CLI parsing, configuration loading,
//! and application lifecycle management.
//!
//! ## Quick Start
//!
//! ```bash
//! # Run with default configuration, first display in the catalog
//! arcade
//!
//! # Start on a specific display backend
//! arcade plugins/libterminal.so
//!
//! # Specify custom configuration
//! arcade --config production.toml
//!
//! # Override specific settings
//! arcade --plugins /opt/arcade/plugins --log-level debug
//!
//! # JSON logging for production
//! arcade --json-logs
//! ```
//!
//! ## Configuration
//!
//! The platform loads configuration from a TOML file (default:
//! `arcade.toml`). If the file doesn't exist, a default configuration will
//! be created.
//!
//! ## In-Session Controls
//!
//! Five reserved keys (rebindable in the config file) are intercepted by
//! the runtime and never reach the active game:
//! - F1/F2: previous/next display backend
//! - F3/F4: previous/next game
//! - Escape: quit
//!
//! ## Architecture
//!
//! * **Capability Contracts**: Displays and games meet only through traits
//! * **Hot Swapping**: Either side replaceable mid-session, state preserved
//! * **ABI Checked**: Version-stamped plugin loading with graceful skips
//! * **Single-Threaded**: One deterministic tick loop, no locking

use tracing::error;

mod app;
mod cli;
mod config;
mod logging;

use app::Application;
use cli::CliArgs;
use config::AppConfig;

/// Main entry point for the arcade platform.
///
/// Handles the complete application lifecycle including:
/// 1. Command-line argument parsing
/// 2. Configuration loading and validation
/// 3. Logging system initialization
/// 4. Application creation and execution
/// 5. Error handling and cleanup
///
/// # Exit Codes
///
/// * **0**: Successful execution and shutdown
/// * **1**: Error during startup, configuration, or runtime
pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    // Parse CLI arguments first
    let args = CliArgs::parse();

    // Load configuration to get logging settings
    let config = AppConfig::load_from_file(&args.config_path).unwrap_or_default();

    // Setup logging before anything else
    if let Err(e) = logging::setup_logging(&config.logging, args.json_logs) {
        eprintln!("❌ Failed to setup logging: {e}");
        std::process::exit(1);
    }

    // Create and run application
    match Application::new(args) {
        Ok(app) => {
            if let Err(e) = app.run() {
                error!("❌ Application error: {e:?}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            error!("❌ Failed to start application: {e:?}");
            std::process::exit(1);
        }
    }

    Ok(())
}

// Re-export main types for potential library usage
pub use config::{LoggingSettings, PluginSettings, RuntimeSettings};
