//! CLI runner for common setup.
//!
//! Loads the configuration file and initializes logging for commands that
//! run the service.

use std::path::{Path, PathBuf};

use fleetwatch::config::{config_file_path, ConfigFile};
use fleetwatch::logging::{init_logging, LoggingGuard};
use tracing::info;

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    logging_guard: LoggingGuard,
    config: ConfigFile,
    config_path: PathBuf,
}

impl CliRunner {
    /// Load config (defaults if absent) and initialize logging.
    pub fn new(config_path: Option<&Path>) -> Result<Self, CliError> {
        let config_path = resolve_config_path(config_path);
        let config = ConfigFile::load_from(&config_path)?;

        let logging_guard = init_logging(&config.logging.directory, &config.logging.file)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
            config_path,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ConfigFile {
        &mut self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("FleetWatch v{}", fleetwatch::VERSION);
        info!(
            config = %self.config_path.display(),
            log = %self.logging_guard.path().display(),
            "FleetWatch CLI: {} command",
            command
        );
    }

    /// Build a multi-threaded tokio runtime.
    pub fn runtime(&self) -> Result<tokio::runtime::Runtime, CliError> {
        build_runtime()
    }
}

/// Config path from the command line, or the default location.
pub fn resolve_config_path(cli_path: Option<&Path>) -> PathBuf {
    cli_path
        .map(Path::to_path_buf)
        .unwrap_or_else(config_file_path)
}

pub fn build_runtime() -> Result<tokio::runtime::Runtime, CliError> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)
}
