//! Upstream Pearl API contract.
//!
//! The upstream exposes an OpenAI-style chat-completion endpoint. Every
//! request pins the model to the Pearl question-answering engine and
//! carries the session ID and service tier as call metadata; HTTP 422
//! means the expert-routing pipeline has not produced a result yet.

use crate::error::GatewayError;
use async_trait::async_trait;
use pearl_mcp_core::PearlMode;
use pearl_mcp_conversation::Message;
use serde::{Deserialize, Serialize};

/// Model identifier, fixed to the Pearl question-answering engine.
pub const PEARL_MODEL: &str = "pearl-ai";

/// Call metadata identifying the conversation and requested tier.
#[derive(Debug, Clone, Serialize)]
pub struct CallMetadata {
    /// The session this call belongs to, in display form.
    #[serde(rename = "sessionId")]
    pub session_id: String,
    /// The requested service tier.
    pub mode: PearlMode,
}

/// A chat-completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model identifier; always [`PEARL_MODEL`].
    pub model: &'static str,
    /// The session transcript as currently stored.
    pub messages: Vec<Message>,
    /// Session and tier metadata.
    pub metadata: CallMetadata,
}

impl ChatRequest {
    /// Builds a request for the given transcript, session, and tier.
    #[must_use]
    pub fn new(messages: Vec<Message>, session_id: impl Into<String>, mode: PearlMode) -> Self {
        Self {
            model: PEARL_MODEL,
            messages,
            metadata: CallMetadata {
                session_id: session_id.into(),
                mode,
            },
        }
    }
}

/// One choice in a chat-completion response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatChoice {
    /// The generated message.
    pub message: Message,
}

/// A chat-completion response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatCompletion {
    /// Generated choices; the first one carries the answer.
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

impl ChatCompletion {
    /// Returns the answer text, if the response carries one.
    #[must_use]
    pub fn answer(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

/// The upstream transport seam.
///
/// Production uses [`HttpPearlApi`]; tests script outcomes through their
/// own implementations.
#[async_trait]
pub trait PearlApi: Send + Sync {
    /// Issues one chat-completion call.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] classifying the failure; only
    /// [`GatewayError::ExpertPending`] is retryable.
    async fn create_completion(&self, request: &ChatRequest) -> Result<ChatCompletion, GatewayError>;
}

#[async_trait]
impl<T: PearlApi + ?Sized> PearlApi for std::sync::Arc<T> {
    async fn create_completion(&self, request: &ChatRequest) -> Result<ChatCompletion, GatewayError> {
        (**self).create_completion(request).await
    }
}

/// reqwest-backed Pearl API client.
pub struct HttpPearlApi {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpPearlApi {
    /// Creates a client for the given credentials and endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::MissingApiKey`] if the key is empty,
    /// before any session work happens.
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self, GatewayError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(GatewayError::MissingApiKey);
        }

        Ok(Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl PearlApi for HttpPearlApi {
    async fn create_completion(&self, request: &ChatRequest) -> Result<ChatCompletion, GatewayError> {
        let response = self
            .http
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| GatewayError::Network {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNPROCESSABLE_ENTITY {
            let detail = response.text().await.unwrap_or_default();
            return Err(GatewayError::ExpertPending { detail });
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<ChatCompletion>()
            .await
            .map_err(|e| GatewayError::MalformedResponse {
                reason: e.to_string(),
            })
    }
}
