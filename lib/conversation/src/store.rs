//! Session Store: ordered per-session message transcripts.
//!
//! The store is a process-lifetime map from session ID to the transcript
//! sent upstream. Messages are only ever appended, or wholesale-replaced
//! by history compaction. No I/O, no side effects beyond the map.

use crate::message::{Message, MessageRole};
use pearl_mcp_core::SessionId;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// In-memory store of conversation transcripts, keyed by session ID.
///
/// Cloning shares the underlying map, so one store can be handed to each
/// concurrently running tool invocation. Sessions are never evicted.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Vec<Message>>>>,
}

impl SessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the transcript for a session, empty if unknown.
    #[must_use]
    pub fn history(&self, id: SessionId) -> Vec<Message> {
        let sessions = self.sessions.read().unwrap();
        sessions.get(&id).cloned().unwrap_or_default()
    }

    /// Returns the number of messages stored for a session.
    #[must_use]
    pub fn message_count(&self, id: SessionId) -> usize {
        let sessions = self.sessions.read().unwrap();
        sessions.get(&id).map_or(0, Vec::len)
    }

    /// Appends a message to a session, creating the session if absent.
    pub fn append(&self, id: SessionId, message: Message) {
        let mut sessions = self.sessions.write().unwrap();
        sessions.entry(id).or_default().push(message);
    }

    /// Appends a user message to a session, creating the session if absent.
    pub fn append_user(&self, id: SessionId, content: impl Into<String>) {
        self.append(id, Message::new(MessageRole::User, content));
    }

    /// Destructively overwrites a session's transcript (used by compaction).
    pub fn replace(&self, id: SessionId, messages: Vec<Message>) {
        let mut sessions = self.sessions.write().unwrap();
        sessions.insert(id, messages);
    }
}

impl Clone for SessionStore {
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
        }
    }
}
