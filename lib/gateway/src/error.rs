//! Error types for the gateway crate.

use std::fmt;

/// Errors from upstream Pearl API operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// No API key was provided at client construction.
    MissingApiKey,
    /// HTTP 422: expert routing has not produced a result yet. This is
    /// the only failure class the gateway retries.
    ExpertPending { detail: String },
    /// Any other non-2xx upstream status.
    Api { status: u16, message: String },
    /// Transport-level failure reaching the upstream API.
    Network { reason: String },
    /// The upstream response body could not be interpreted.
    MalformedResponse { reason: String },
}

impl GatewayError {
    /// Returns true if the failure is the transient "still processing"
    /// class that warrants another attempt.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ExpertPending { .. })
    }
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingApiKey => write!(f, "Pearl API key must be provided"),
            Self::ExpertPending { detail } => {
                if detail.is_empty() {
                    write!(f, "expert verification in progress (HTTP 422)")
                } else {
                    write!(f, "expert verification in progress (HTTP 422): {detail}")
                }
            }
            Self::Api { status, message } => {
                write!(f, "Pearl API request failed with HTTP {status}: {message}")
            }
            Self::Network { reason } => write!(f, "network error calling Pearl API: {reason}"),
            Self::MalformedResponse { reason } => {
                write!(f, "failed to parse Pearl API response: {reason}")
            }
        }
    }
}

impl std::error::Error for GatewayError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_expert_pending_is_retryable() {
        assert!(GatewayError::ExpertPending {
            detail: String::new()
        }
        .is_retryable());

        assert!(!GatewayError::MissingApiKey.is_retryable());
        assert!(!GatewayError::Api {
            status: 401,
            message: "unauthorized".to_string()
        }
        .is_retryable());
        assert!(!GatewayError::Network {
            reason: "connection refused".to_string()
        }
        .is_retryable());
        assert!(!GatewayError::MalformedResponse {
            reason: "missing choices".to_string()
        }
        .is_retryable());
    }

    #[test]
    fn api_error_display() {
        let err = GatewayError::Api {
            status: 500,
            message: "internal error".to_string(),
        };
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("internal error"));
    }

    #[test]
    fn expert_pending_display() {
        let err = GatewayError::ExpertPending {
            detail: String::new(),
        };
        assert!(err.to_string().contains("422"));
    }
}
