//! Active-Conversation Registry: per-session metadata and status.
//!
//! One metadata record per session, created on the first call with no
//! session ID and mutated on every subsequent call. Records live for the
//! process lifetime; they are never deleted.

use crate::error::SessionError;
use chrono::{DateTime, Utc};
use pearl_mcp_core::{PearlMode, SessionId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// The status of a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStatus {
    /// A call for this session is being processed.
    InProgress,
    /// The most recent call completed successfully.
    Completed,
    /// The most recent call failed; see the recorded error.
    Failed,
}

/// Metadata for an active conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMetadata {
    /// The service tier, fixed at creation.
    pub mode: PearlMode,
    /// Current status.
    pub status: ConversationStatus,
    /// When the conversation was created.
    pub created_at: DateTime<Utc>,
    /// When the conversation was last re-entered, absent until the first
    /// follow-up call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<DateTime<Utc>>,
    /// Description of the last failure, present only while failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConversationMetadata {
    fn new(mode: PearlMode) -> Self {
        Self {
            mode,
            status: ConversationStatus::InProgress,
            created_at: Utc::now(),
            last_activity: None,
            error: None,
        }
    }
}

/// Registry of active conversations, keyed by session ID.
///
/// Cloning shares the underlying map. Status transitions go through the
/// methods here; the valid transitions are creation/re-entry to
/// `InProgress`, then `Completed` or `Failed`, with both terminal states
/// re-enterable on the next call for the same session.
#[derive(Debug, Default)]
pub struct ConversationRegistry {
    conversations: Arc<RwLock<HashMap<SessionId, ConversationMetadata>>>,
}

impl ConversationRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new conversation with the given mode, in progress.
    pub fn create(&self, id: SessionId, mode: PearlMode) {
        let mut conversations = self.conversations.write().unwrap();
        conversations.insert(id, ConversationMetadata::new(mode));
    }

    /// Re-enters an existing conversation: status back to in-progress,
    /// activity timestamp refreshed, any previous failure cleared.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] for an unknown session ID.
    pub fn touch(&self, id: SessionId) -> Result<(), SessionError> {
        let mut conversations = self.conversations.write().unwrap();
        let meta = conversations
            .get_mut(&id)
            .ok_or(SessionError::NotFound { id })?;
        meta.status = ConversationStatus::InProgress;
        meta.last_activity = Some(Utc::now());
        meta.error = None;
        Ok(())
    }

    /// Marks a conversation's current call as completed.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] for an unknown session ID.
    pub fn complete(&self, id: SessionId) -> Result<(), SessionError> {
        let mut conversations = self.conversations.write().unwrap();
        let meta = conversations
            .get_mut(&id)
            .ok_or(SessionError::NotFound { id })?;
        meta.status = ConversationStatus::Completed;
        meta.error = None;
        Ok(())
    }

    /// Marks a conversation's current call as failed, recording the error.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] for an unknown session ID.
    pub fn fail(&self, id: SessionId, error: impl Into<String>) -> Result<(), SessionError> {
        let mut conversations = self.conversations.write().unwrap();
        let meta = conversations
            .get_mut(&id)
            .ok_or(SessionError::NotFound { id })?;
        meta.status = ConversationStatus::Failed;
        meta.error = Some(error.into());
        Ok(())
    }

    /// Returns a snapshot of a conversation's metadata.
    #[must_use]
    pub fn get(&self, id: SessionId) -> Option<ConversationMetadata> {
        let conversations = self.conversations.read().unwrap();
        conversations.get(&id).cloned()
    }

    /// Returns true if the session ID is registered.
    #[must_use]
    pub fn contains(&self, id: SessionId) -> bool {
        let conversations = self.conversations.read().unwrap();
        conversations.contains_key(&id)
    }
}

impl Clone for ConversationRegistry {
    fn clone(&self) -> Self {
        Self {
            conversations: Arc::clone(&self.conversations),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_starts_in_progress() {
        let registry = ConversationRegistry::new();
        let id = SessionId::new();

        registry.create(id, PearlMode::AiOnly);

        let meta = registry.get(id).expect("should exist");
        assert_eq!(meta.mode, PearlMode::AiOnly);
        assert_eq!(meta.status, ConversationStatus::InProgress);
        assert!(meta.last_activity.is_none());
        assert!(meta.error.is_none());
    }

    #[test]
    fn complete_transition() {
        let registry = ConversationRegistry::new();
        let id = SessionId::new();

        registry.create(id, PearlMode::Expert);
        registry.complete(id).expect("should complete");

        let meta = registry.get(id).expect("should exist");
        assert_eq!(meta.status, ConversationStatus::Completed);
    }

    #[test]
    fn fail_records_error() {
        let registry = ConversationRegistry::new();
        let id = SessionId::new();

        registry.create(id, PearlMode::AiExpert);
        registry.fail(id, "upstream exploded").expect("should fail");

        let meta = registry.get(id).expect("should exist");
        assert_eq!(meta.status, ConversationStatus::Failed);
        assert_eq!(meta.error.as_deref(), Some("upstream exploded"));
    }

    #[test]
    fn touch_reenters_failed_conversation() {
        let registry = ConversationRegistry::new();
        let id = SessionId::new();

        registry.create(id, PearlMode::Expert);
        registry.fail(id, "timeout").expect("should fail");
        registry.touch(id).expect("should touch");

        let meta = registry.get(id).expect("should exist");
        assert_eq!(meta.status, ConversationStatus::InProgress);
        assert!(meta.error.is_none());
        assert!(meta.last_activity.is_some());
    }

    #[test]
    fn touch_unknown_session_errors() {
        let registry = ConversationRegistry::new();
        let id = SessionId::new();

        assert_eq!(registry.touch(id), Err(SessionError::NotFound { id }));
        assert!(registry.get(id).is_none());
        assert!(!registry.contains(id));
    }

    #[test]
    fn mode_is_fixed_across_transitions() {
        let registry = ConversationRegistry::new();
        let id = SessionId::new();

        registry.create(id, PearlMode::AiOnly);
        registry.complete(id).expect("complete");
        registry.touch(id).expect("touch");

        assert_eq!(registry.get(id).expect("exists").mode, PearlMode::AiOnly);
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&ConversationStatus::InProgress).expect("serialize");
        assert_eq!(json, "\"in_progress\"");
    }
}
