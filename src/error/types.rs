//! Error types
//!
//! Domain-specific error types for the chat relay server. Per-connection
//! I/O failures are never surfaced through these: a broken peer tears its
//! own handler down silently. These types cover the fallible startup path.

use std::fmt;
use std::io;

/// Errors that can prevent the server from starting.
#[derive(Debug)]
pub enum ServerError {
    /// Failed to bind the listening socket.
    Bind { addr: String, source: io::Error },
    /// Failed to load or deserialize the configuration.
    Config(config::ConfigError),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Bind { addr, source } => {
                write!(f, "Failed to bind to {}: {}", addr, source)
            }
            ServerError::Config(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl std::error::Error for ServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServerError::Bind { source, .. } => Some(source),
            ServerError::Config(e) => Some(e),
        }
    }
}

impl From<config::ConfigError> for ServerError {
    fn from(error: config::ConfigError) -> Self {
        ServerError::Config(error)
    }
}
