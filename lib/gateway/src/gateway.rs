//! The retrying upstream call gateway.
//!
//! Wraps one upstream call in a bounded retry loop scoped to the
//! "expert verification in progress" failure class. Every other failure
//! propagates immediately and unmodified. On success the returned
//! assistant message is appended to the session transcript, so it shows
//! up in subsequent history reads.

use crate::api::{ChatCompletion, ChatRequest, PearlApi};
use crate::error::GatewayError;
use crate::retry::RetryConfig;
use pearl_mcp_core::{PearlMode, SessionId};
use pearl_mcp_conversation::{Message, SessionStore};

/// Upstream call gateway with bounded retry.
pub struct Gateway<A> {
    api: A,
    retry: RetryConfig,
}

impl<A: PearlApi> Gateway<A> {
    /// Creates a gateway over the given transport and retry bounds.
    #[must_use]
    pub fn new(api: A, retry: RetryConfig) -> Self {
        Self { api, retry }
    }

    /// Sends the transcript upstream for the given session and tier.
    ///
    /// Retries only while the failure is retryable and attempts remain,
    /// sleeping a randomized exponential backoff between attempts. The
    /// sleep suspends the invoking task; cancelling the future mid-wait
    /// issues no further attempts and leaves the store untouched.
    ///
    /// # Errors
    ///
    /// Propagates the first non-retryable failure, or the last retryable
    /// one once attempts are exhausted.
    pub async fn call(
        &self,
        store: &SessionStore,
        messages: Vec<Message>,
        session_id: SessionId,
        mode: PearlMode,
    ) -> Result<ChatCompletion, GatewayError> {
        let request = ChatRequest::new(messages, session_id.to_string(), mode);
        let attempts = self.retry.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            match self.api.create_completion(&request).await {
                Ok(completion) => {
                    let Some(choice) = completion.choices.first() else {
                        return Err(GatewayError::MalformedResponse {
                            reason: "response carried no choices".to_string(),
                        });
                    };
                    store.append(session_id, choice.message.clone());
                    return Ok(completion);
                }
                Err(e) if e.is_retryable() && attempt + 1 < attempts => {
                    let wait = self.retry.backoff_wait(attempt);
                    tracing::info!(
                        session_id = %session_id,
                        attempt = attempt + 1,
                        wait_ms = wait.as_millis() as u64,
                        "expert verification in progress, will retry"
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                Err(e) => {
                    if e.is_retryable() {
                        tracing::warn!(
                            session_id = %session_id,
                            attempts,
                            "retries exhausted waiting for expert verification"
                        );
                    } else {
                        tracing::warn!(session_id = %session_id, error = %e, "Pearl API call failed");
                    }
                    return Err(e);
                }
            }
        }
    }
}
