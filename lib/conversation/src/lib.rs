//! Conversation state for the Pearl MCP server.
//!
//! This crate provides:
//!
//! - **Session Store**: ordered per-session message transcripts
//! - **Active-Conversation Registry**: per-session metadata and status
//! - **History Compaction**: folding a caller-supplied transcript into
//!   the canonical single-session form sent upstream

pub mod compact;
pub mod error;
pub mod message;
pub mod registry;
pub mod store;

pub use compact::{compact_history, fold_transcript};
pub use error::SessionError;
pub use message::{Message, MessageRole};
pub use registry::{ConversationMetadata, ConversationRegistry, ConversationStatus};
pub use store::SessionStore;
