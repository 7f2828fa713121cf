//! Error types for the conversation crate.

use pearl_mcp_core::SessionId;
use std::fmt;

/// Errors from session registry operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Session not found in the registry.
    NotFound { id: SessionId },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { id } => write!(f, "no conversation found with session ID: {id}"),
        }
    }
}

impl std::error::Error for SessionError {}
