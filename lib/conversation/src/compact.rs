//! History compaction.
//!
//! The upstream API is single-turn per tier switch, so a caller-supplied
//! multi-turn transcript is folded into one human-readable block before
//! it is sent. A single user message is kept verbatim instead; experts
//! must see unparaphrased first-person statements.

use crate::message::{Message, MessageRole};
use crate::store::SessionStore;
use pearl_mcp_core::SessionId;

/// Label prefixing user turns in a folded transcript.
const CUSTOMER_LABEL: &str = "Customer: ";

/// Label prefixing assistant (and any non-user) turns in a folded transcript.
const ASSISTANT_LABEL: &str = "AI Assistant: ";

/// Folds a transcript into a single human-readable block.
///
/// Each entry renders, in original order, as its role label followed by
/// the content and a blank-line separator.
#[must_use]
pub fn fold_transcript(transcript: &[Message]) -> String {
    let mut folded = String::new();
    for message in transcript {
        let label = match message.role {
            MessageRole::User => CUSTOMER_LABEL,
            _ => ASSISTANT_LABEL,
        };
        folded.push_str(label);
        folded.push_str(&message.content);
        folded.push_str("\n\n");
    }
    folded
}

/// Brings a session's stored transcript into canonical form for the next
/// upstream call.
///
/// - No transcript supplied: a continuation. Only `question` is appended
///   as a user message.
/// - A single user-role entry: stored verbatim, replacing any prior
///   transcript (preserves the caller's exact wording).
/// - Anything else: the whole transcript folds into one synthesized user
///   message that replaces the session's messages.
pub fn compact_history(
    store: &SessionStore,
    id: SessionId,
    question: &str,
    chat_history: Option<&[Message]>,
) {
    match chat_history {
        None | Some([]) => store.append_user(id, question),
        Some([only]) if only.role == MessageRole::User => {
            store.replace(id, vec![only.clone()]);
        }
        Some(transcript) => {
            store.replace(id, vec![Message::user(fold_transcript(transcript))]);
        }
    }
}
