//! Error types for the server binary.

use std::fmt;

/// Errors that abort server startup or a transport loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerError {
    /// Configuration is missing or invalid.
    Config { reason: String },
    /// Transport I/O failed.
    Io { reason: String },
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { reason } => write!(f, "configuration error: {reason}"),
            Self::Io { reason } => write!(f, "transport I/O error: {reason}"),
        }
    }
}

impl std::error::Error for ServerError {}
