//! Service error types.

use std::fmt;

use crate::transport::TransportError;

/// Errors that can occur while starting or running the tracking service.
#[derive(Debug)]
pub enum ServiceError {
    /// The WebSocket gateway could not be started
    Transport(TransportError),
    /// Invalid configuration
    ConfigError(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "Transport error: {}", e),
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            Self::ConfigError(_) => None,
        }
    }
}

impl From<TransportError> for ServiceError {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}
