//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use fleetwatch::config::ConfigFileError;
use fleetwatch::service::ServiceError;
use fleetwatch::transport::TransportError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Failed to build the async runtime
    Runtime(std::io::Error),
    /// Failed to install the Ctrl+C handler
    Signal(String),
    /// Failed to start or run the tracking service
    Serve(ServiceError),
    /// Connection to a gateway failed
    Connection(TransportError),
    /// Failed to read an input file
    FileRead { path: String, error: std::io::Error },
    /// Invalid command-line value
    InvalidArgument(String),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Serve(ServiceError::Transport(_)) => {
                eprintln!();
                eprintln!("Common issues:");
                eprintln!("  1. Address in use: another instance may already be listening");
                eprintln!("  2. Set a different address with --listen or [server] listen in config.ini");
            }
            CliError::Connection(_) => {
                eprintln!();
                eprintln!("Make sure `fleetwatch serve` is running and the URL starts with ws://");
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
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
            CliError::Signal(msg) => write!(f, "Failed to install signal handler: {}", msg),
            CliError::Serve(e) => write!(f, "Tracking service error: {}", e),
            CliError::Connection(e) => write!(f, "Gateway connection error: {}", e),
            CliError::FileRead { path, error } => {
                write!(f, "Failed to read file '{}': {}", path, error)
            }
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Runtime(e) => Some(e),
            CliError::Serve(e) => Some(e),
            CliError::Connection(e) => Some(e),
            CliError::FileRead { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<ServiceError> for CliError {
    fn from(e: ServiceError) -> Self {
        CliError::Serve(e)
    }
}

impl From<TransportError> for CliError {
    fn from(e: TransportError) -> Self {
        CliError::Connection(e)
    }
}
