//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::path::PathBuf;
use std::process;

use navtrack::config::ConfigFileError;
use navtrack::geometry::PolylineError;
use navtrack::navigation::NavigationError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(ConfigFileError),
    /// Route file could not be read
    RouteRead { path: PathBuf, error: std::io::Error },
    /// Route file is not a valid route
    RouteParse { path: PathBuf, error: serde_json::Error },
    /// Route geometry could not be decoded
    Geometry(PolylineError),
    /// Failed to start the async runtime
    Runtime(std::io::Error),
    /// Navigation engine rejected the session
    Navigation(NavigationError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::RouteParse { .. } => {
                eprintln!();
                eprintln!("The route file must hold a single route object with");
                eprintln!("`distance`, `duration` and `legs`, each leg holding `steps`.");
            }
            CliError::Config(_) => {
                eprintln!();
                eprintln!("Check the file passed with --config, or remove it to use defaults.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::RouteRead { path, error } => {
                write!(f, "Failed to read route '{}': {}", path.display(), error)
            }
            CliError::RouteParse { path, error } => {
                write!(f, "Invalid route '{}': {}", path.display(), error)
            }
            CliError::Geometry(e) => write!(f, "Invalid route geometry: {}", e),
            CliError::Runtime(e) => write!(f, "Failed to start runtime: {}", e),
            CliError::Navigation(e) => write!(f, "Navigation failed: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::RouteRead { error, .. } => Some(error),
            CliError::RouteParse { error, .. } => Some(error),
            CliError::Geometry(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            CliError::Navigation(e) => Some(e),
            CliError::LoggingInit(_) => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<NavigationError> for CliError {
    fn from(e: NavigationError) -> Self {
        CliError::Navigation(e)
    }
}

impl From<PolylineError> for CliError {
    fn from(e: PolylineError) -> Self {
        CliError::Geometry(e)
    }
}
