//! Shared server state.
//!
//! One `AppState` is constructed at startup and handed by `Arc` to every
//! tool invocation. The session store and conversation registry live
//! here for the process lifetime, never as ambient globals, so tests
//! construct isolated instances.

use crate::config::ServerConfig;
use crate::error::ServerError;
use pearl_mcp_conversation::{ConversationRegistry, SessionStore};
use pearl_mcp_gateway::{Gateway, HttpPearlApi, PearlApi, RetryConfig};
use std::sync::Arc;

/// State shared across all tool invocations.
pub struct AppState {
    /// Per-session message transcripts.
    pub store: SessionStore,
    /// Per-session conversation metadata.
    pub registry: ConversationRegistry,
    /// The retrying upstream gateway.
    pub gateway: Gateway<Arc<dyn PearlApi>>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    /// Creates state over an arbitrary upstream transport.
    #[must_use]
    pub fn new(api: Arc<dyn PearlApi>, retry: RetryConfig) -> Self {
        Self {
            store: SessionStore::new(),
            registry: ConversationRegistry::new(),
            gateway: Gateway::new(api, retry),
        }
    }

    /// Creates state from configuration, wiring the HTTP transport.
    ///
    /// # Errors
    ///
    /// Fails fast on a missing or empty API key, before any session work.
    pub fn from_config(config: &ServerConfig) -> Result<Self, ServerError> {
        let api_key = config.api_key.clone().unwrap_or_default();
        let api = HttpPearlApi::new(api_key, config.api_base_url.clone()).map_err(|e| {
            ServerError::Config {
                reason: e.to_string(),
            }
        })?;

        Ok(Self::new(Arc::new(api), config.retry_config()))
    }
}
