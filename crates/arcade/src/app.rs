//! Main application logic and lifecycle management.
//!
//! This module contains the core `Application` struct that orchestrates
//! plugin discovery, runtime startup, the tick loop, and shutdown.

use crate::{cli::CliArgs, config::AppConfig, logging::display_banner};
use arcade_core::Runtime;
use arcade_plugins::{DynamicLoader, Registry};
use std::path::PathBuf;
use tracing::info;

/// Main application struct for the arcade platform.
///
/// The `Application` struct manages the complete lifecycle of an arcade
/// session: configuration loading, plugin directory scanning, runtime
/// startup with the requested display backend, and the tick loop until
/// quit.
pub struct Application {
    /// Loaded application configuration
    config: AppConfig,
    /// Live runtime driving the active display and game
    runtime: Runtime<DynamicLoader>,
}

impl Application {
    /// Creates a new application instance.
    ///
    /// Loads configuration, applies CLI overrides, validates settings,
    /// scans the plugin directory, and starts the runtime with proper error
    /// handling.
    ///
    /// # Arguments
    ///
    /// * `args` - Parsed command-line arguments
    ///
    /// # Returns
    ///
    /// A configured `Application` instance ready to run, or an error if
    /// initialization failed.
    ///
    /// # Process
    ///
    /// 1. Load configuration from file (creating default if missing)
    /// 2. Apply command-line argument overrides
    /// 3. Validate merged configuration
    /// 4. Display startup banner
    /// 5. Scan the plugin directory and categorize libraries
    /// 6. Start the runtime on the requested display backend
    pub fn new(args: CliArgs) -> Result<Self, Box<dyn std::error::Error>> {
        // Load configuration first (before logging setup)
        info!("🔧 Loading configuration from: {}", args.config_path.display());
        let mut config = AppConfig::load_from_file(&args.config_path)?;

        info!("✅ Configuration loaded successfully from {}", args.config_path.display());

        // Apply CLI overrides
        if let Some(plugin_dir) = args.plugin_dir {
            config.plugins.directory = plugin_dir.to_string_lossy().to_string();
        }

        if let Some(log_level) = args.log_level {
            config.logging.level = log_level;
        }

        if args.json_logs {
            config.logging.json_format = true;
        }

        // Validate configuration
        if let Err(e) = config.validate() {
            return Err(format!("Configuration validation failed: {e}").into());
        }
        info!("✅ Configuration loaded and validated successfully");

        // Display banner after logging is setup
        display_banner();

        // Discover and categorize plugin libraries
        let registry = Registry::scan(&config.plugins.directory)?;

        // Start the runtime on the requested (or first) display backend
        let runtime_config = config.to_runtime_config(args.display);
        let mut runtime = Runtime::start(DynamicLoader::new(), registry, runtime_config)?;
        runtime.set_game_over_hook(Box::new(|game, score| {
            info!("🏆 {game}: {} scored {}", score.player, score.points);
        }));

        // Log startup information
        info!("🚀 Arcade Platform v{}", env!("CARGO_PKG_VERSION"));
        info!("🏗️ Architecture: Runtime Core + Dynamic Plugin Catalogs");
        info!(
            "📂 Config: {} | Plugins: {}",
            args.config_path.display(),
            config.plugins.directory
        );

        Ok(Self { config, runtime })
    }

    /// Runs the application until the session ends.
    ///
    /// Drives the tick loop until a quit request or a fatal display error,
    /// then reports final session information.
    ///
    /// # Returns
    ///
    /// `Ok(())` if the session ran and shut down cleanly, or an error if a
    /// fatal failure ended it.
    pub fn run(mut self) -> Result<(), Box<dyn std::error::Error>> {
        info!("🌟 Starting arcade session");

        self.log_configuration_summary();
        info!(
            "🖥️ Active display: {} | 🎮 Active game: {}",
            self.runtime.active_display_name(),
            self.runtime.active_game_name()
        );
        info!("🛑 Press {:?} to quit", self.config.controls.quit);

        let result = self.runtime.run();

        match &result {
            Ok(()) => info!("✅ Arcade session ended cleanly"),
            Err(e) => tracing::error!("❌ Arcade session ended with a fatal error: {e}"),
        }
        info!("👋 Thanks for playing!");

        result.map_err(Into::into)
    }

    /// Logs the configuration summary at startup.
    fn log_configuration_summary(&self) {
        info!("📋 Configuration Summary:");
        info!("  🔌 Plugin directory: {}", self.config.plugins.directory);
        info!("  ⏱️ Poll timeout: {}ms", self.config.runtime.tick_timeout_ms);
        info!(
            "  🏆 Score directory: {}",
            PathBuf::from(&self.config.runtime.score_directory).display()
        );
        info!(
            "  🎛️ Controls: display {:?}/{:?} | game {:?}/{:?} | quit {:?}",
            self.config.controls.previous_display,
            self.config.controls.next_display,
            self.config.controls.previous_game,
            self.config.controls.next_game,
            self.config.controls.quit
        );
    }
}
