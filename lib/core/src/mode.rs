//! Pearl service tiers.
//!
//! A conversation is pinned to one tier at creation and keeps it for its
//! whole lifetime. The wire names are part of the upstream API contract.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The Pearl service tier requested for a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PearlMode {
    /// AI-only response, no human review.
    #[serde(rename = "pearl-ai")]
    AiOnly,
    /// AI intake questions, then transition to a human expert.
    #[serde(rename = "pearl-ai-expert")]
    AiExpert,
    /// Direct connection to a human expert.
    #[serde(rename = "expert")]
    Expert,
}

impl PearlMode {
    /// Returns the wire name sent in upstream call metadata.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AiOnly => "pearl-ai",
            Self::AiExpert => "pearl-ai-expert",
            Self::Expert => "expert",
        }
    }
}

impl fmt::Display for PearlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names() {
        assert_eq!(PearlMode::AiOnly.as_str(), "pearl-ai");
        assert_eq!(PearlMode::AiExpert.as_str(), "pearl-ai-expert");
        assert_eq!(PearlMode::Expert.as_str(), "expert");
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&PearlMode::AiExpert).expect("serialize");
        assert_eq!(json, "\"pearl-ai-expert\"");

        let parsed: PearlMode = serde_json::from_str("\"expert\"").expect("deserialize");
        assert_eq!(parsed, PearlMode::Expert);
    }

    #[test]
    fn display_matches_wire_name() {
        assert_eq!(PearlMode::AiOnly.to_string(), "pearl-ai");
    }
}
