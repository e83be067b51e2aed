//! CLI runner for common setup.
//!
//! Encapsulates option loading and logging initialization so command
//! handlers start from a ready environment.

use std::path::Path;

use navtrack::config::NavigationOptions;
use navtrack::logging::{default_log_dir, init_logging, LoggingGuard, DEFAULT_LOG_FILE};
use tracing::info;

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Keeps the log file writer alive while the runner exists
    _logging_guard: LoggingGuard,
    options: NavigationOptions,
}

impl CliRunner {
    /// Load options and initialize logging.
    ///
    /// Options come from `config` when given, otherwise from the default
    /// config file. A missing file yields defaults.
    pub fn new(config: Option<&Path>) -> Result<Self, CliError> {
        let options = match config {
            Some(path) => NavigationOptions::load_from(path)?,
            None => NavigationOptions::load()?,
        };

        let logging_guard = init_logging(&default_log_dir(), DEFAULT_LOG_FILE)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            _logging_guard: logging_guard,
            options,
        })
    }

    /// Get the loaded navigation options.
    pub fn options(&self) -> &NavigationOptions {
        &self.options
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("navtrack v{}", navtrack::VERSION);
        info!(command, "navtrack CLI starting");
    }
}
