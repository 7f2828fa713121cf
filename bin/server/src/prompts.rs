//! Prompt templates for common expert questions.

use crate::mcp::types::PromptDefinition;
use serde::Serialize;
use serde_json::{json, Value};

/// A prompt ready to hand to the client.
#[derive(Debug, Clone, Serialize)]
pub struct Prompt {
    pub description: String,
    pub messages: Vec<Value>,
}

fn user_message(text: &str) -> Value {
    json!({
        "role": "user",
        "content": { "type": "text", "text": text },
    })
}

/// Returns the definitions of all prompts.
#[must_use]
pub fn definitions() -> Vec<PromptDefinition> {
    vec![
        PromptDefinition {
            name: "ask_legal_question".to_string(),
            description: "Template for asking legal questions to Pearl experts".to_string(),
        },
        PromptDefinition {
            name: "ask_medical_question".to_string(),
            description: "Template for asking medical questions to Pearl experts".to_string(),
        },
    ]
}

/// Looks up a prompt by name.
#[must_use]
pub fn get(name: &str) -> Option<Prompt> {
    match name {
        "ask_legal_question" => Some(Prompt {
            description: "Template for asking legal questions to Pearl experts".to_string(),
            messages: vec![user_message(
                "I have a legal question about [TOPIC]. Specifically, I'd like to know \
                 [SPECIFIC QUESTION]. My situation is [BRIEF DESCRIPTION OF SITUATION]. \
                 What legal options do I have and what should I consider?",
            )],
        }),
        "ask_medical_question" => Some(Prompt {
            description: "Template for asking medical questions to Pearl experts".to_string(),
            messages: vec![user_message(
                "I have a medical question about [CONDITION/SYMPTOM]. Specifically, I'm \
                 experiencing [SYMPTOMS] for [DURATION]. My medical history includes \
                 [RELEVANT HISTORY]. What could this indicate and what should I do next?",
            )],
        }),
        _ => None,
    }
}
