//! Centralized server configuration.
//!
//! Strongly-typed configuration loaded via the `config` crate from
//! `PEARL_`-prefixed environment variables; the CLI may override the
//! API key after loading.

use pearl_mcp_gateway::RetryConfig;
use serde::Deserialize;
use std::time::Duration;

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Pearl API key. Required, but may arrive via the CLI instead of
    /// the environment.
    pub api_key: Option<String>,

    /// Pearl API base URL.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Maximum upstream attempts while expert verification is pending.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Minimum backoff wait between attempts, in seconds.
    #[serde(default = "default_min_retry_wait_secs")]
    pub min_retry_wait_secs: u64,

    /// Maximum backoff wait between attempts, in seconds.
    #[serde(default = "default_max_retry_wait_secs")]
    pub max_retry_wait_secs: u64,
}

fn default_api_base_url() -> String {
    "https://api.pearl.com/api/v1/".to_string()
}

fn default_max_retries() -> u32 {
    10
}

fn default_min_retry_wait_secs() -> u64 {
    1
}

fn default_max_retry_wait_secs() -> u64 {
    60
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: default_api_base_url(),
            max_retries: default_max_retries(),
            min_retry_wait_secs: default_min_retry_wait_secs(),
            max_retry_wait_secs: default_max_retry_wait_secs(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from `PEARL_`-prefixed environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a present variable fails to parse.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("PEARL").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the retry bounds for the gateway.
    #[must_use]
    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::new(
            self.max_retries,
            Duration::from_secs(self.min_retry_wait_secs),
            Duration::from_secs(self.max_retry_wait_secs),
        )
    }
}
