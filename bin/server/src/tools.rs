//! Tool façade: the five MCP tools.
//!
//! Three question-asking entry points (one per Pearl service tier) plus
//! two read-only inspection entry points. Every outcome, including
//! failures, is returned as a plain string so the calling LLM can react
//! conversationally; only the transport layer ever sees protocol errors.

use crate::mcp::types::ToolDefinition;
use crate::state::AppState;
use pearl_mcp_conversation::{compact_history, Message};
use pearl_mcp_core::{PearlMode, SessionId};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Arguments for the three ask tools.
#[derive(Debug, Deserialize)]
struct AskParams {
    question: String,
    #[serde(default)]
    chat_history: Option<Vec<Message>>,
    #[serde(default)]
    session_id: Option<String>,
}

/// Arguments for the two inspection tools.
#[derive(Debug, Deserialize)]
struct SessionParams {
    session_id: String,
}

/// JSON schema shared by the three ask tools.
fn ask_input_schema(history_hint: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "question": {
                "type": "string",
                "description": "The current question or latest message from the user"
            },
            "chat_history": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "role": { "type": "string", "enum": ["user", "assistant", "system"] },
                        "content": { "type": "string" }
                    },
                    "required": ["role", "content"]
                },
                "description": history_hint
            },
            "session_id": {
                "type": "string",
                "description": "Optional session ID for continuing a conversation"
            }
        },
        "required": ["question"]
    })
}

fn session_input_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "session_id": {
                "type": "string",
                "description": "The session ID of the conversation"
            }
        },
        "required": ["session_id"]
    })
}

/// Returns the definitions of all five tools.
#[must_use]
pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "ask_pearl_ai".to_string(),
            description: "Get help from advanced Pearl AI Assistant. Provides a quick AI-only \
                          response without human review. Use when the user asks for another \
                          opinion or alternative view, for non-critical situations where diverse \
                          perspectives are helpful, or when the user is comparing different \
                          approaches or solutions."
                .to_string(),
            input_schema: ask_input_schema(
                "Optional conversation history. This ensures Pearl AI Assistant sees the complete context",
            ),
        },
        ToolDefinition {
            name: "ask_pearl_expert".to_string(),
            description: "Start conversation with advanced Pearl AI Assistant and transition to a \
                          human expert. Best for complex topics where an LLM has lower \
                          confidence: Medical, Legal, Tax, etc. Pearl AI handles intake questions \
                          to gather context, then transitions to a human expert who reviews the \
                          gathered information. Good for technical problems that need detailed \
                          diagnosis."
                .to_string(),
            input_schema: ask_input_schema(
                "Optional conversation history. This ensures experts see the complete context",
            ),
        },
        ToolDefinition {
            name: "ask_expert".to_string(),
            description: "Get direct assistance from a human expert. Use when the user \
                          explicitly asks to speak with a real human expert, is not satisfied \
                          with the AI response, is looking for personalized advice, or is asking \
                          about a complex or sensitive topic that requires human expertise."
                .to_string(),
            input_schema: ask_input_schema(
                "Optional full conversation history between the user and the calling assistant",
            ),
        },
        ToolDefinition {
            name: "get_conversation_status".to_string(),
            description: "Get the status of an active conversation".to_string(),
            input_schema: session_input_schema(),
        },
        ToolDefinition {
            name: "get_conversation_history".to_string(),
            description: "Get the full conversation history for a session".to_string(),
            input_schema: session_input_schema(),
        },
    ]
}

/// Dispatches a tool call by name.
pub async fn dispatch(state: &Arc<AppState>, name: &str, arguments: Value) -> String {
    match name {
        "ask_pearl_ai" => {
            ask(
                state,
                PearlMode::AiOnly,
                "ask_pearl_ai",
                "Failed to get response from Pearl AI.",
                arguments,
            )
            .await
        }
        "ask_pearl_expert" => {
            ask(
                state,
                PearlMode::AiExpert,
                "ask_pearl_expert",
                "Failed to connect with expert after multiple attempts.",
                arguments,
            )
            .await
        }
        "ask_expert" => {
            ask(
                state,
                PearlMode::Expert,
                "ask_expert",
                "Failed to connect with expert.",
                arguments,
            )
            .await
        }
        "get_conversation_status" => conversation_status(state, arguments),
        "get_conversation_history" => conversation_history(state, arguments),
        _ => format!("Error: Unknown tool: {name}"),
    }
}

/// Shared driver for the three ask tools.
///
/// Resolves or creates the session, compacts the supplied history, calls
/// the gateway, and records the status transition from its outcome.
async fn ask(
    state: &Arc<AppState>,
    mode: PearlMode,
    tool_name: &str,
    failure_prefix: &str,
    arguments: Value,
) -> String {
    let params: AskParams = match serde_json::from_value(arguments) {
        Ok(params) => params,
        Err(e) => return format!("Error: Invalid arguments: {e}"),
    };

    let session_id = match &params.session_id {
        None => {
            let id = SessionId::new();
            state.registry.create(id, mode);
            id
        }
        Some(raw) => {
            let known = raw
                .parse::<SessionId>()
                .ok()
                .filter(|id| state.registry.touch(*id).is_ok());
            match known {
                Some(id) => id,
                None => return format!("Error: No conversation found with session ID: {raw}"),
            }
        }
    };

    compact_history(
        &state.store,
        session_id,
        &params.question,
        params.chat_history.as_deref(),
    );

    let messages = state.store.history(session_id);
    match state
        .gateway
        .call(&state.store, messages, session_id, mode)
        .await
    {
        Ok(completion) => {
            if let Err(e) = state.registry.complete(session_id) {
                tracing::warn!(session_id = %session_id, error = %e, "completed unknown session");
            }

            let session = session_id.to_string();
            let result = json!({
                "answer": completion.answer().unwrap_or_default(),
                "session_id": &session,
                "status": "completed",
                "next_steps": {
                    "continue_conversation": {
                        "tool": tool_name,
                        "parameters": {
                            "question": "Your follow-up question here",
                            "session_id": &session,
                        }
                    },
                    "view_history": {
                        "tool": "get_conversation_history",
                        "parameters": {
                            "session_id": &session,
                        }
                    }
                }
            });
            serde_json::to_string_pretty(&result)
                .unwrap_or_else(|e| format!("Error: Failed to encode response: {e}"))
        }
        Err(e) => {
            if let Err(reg_err) = state.registry.fail(session_id, e.to_string()) {
                tracing::warn!(session_id = %session_id, error = %reg_err, "failed unknown session");
            }
            format!("Error: {failure_prefix} {e}")
        }
    }
}

/// Implements `get_conversation_status`.
fn conversation_status(state: &Arc<AppState>, arguments: Value) -> String {
    let params: SessionParams = match serde_json::from_value(arguments) {
        Ok(params) => params,
        Err(e) => return format!("Error: Invalid arguments: {e}"),
    };

    let meta = params
        .session_id
        .parse::<SessionId>()
        .ok()
        .and_then(|id| state.registry.get(id).map(|meta| (id, meta)));

    match meta {
        Some((id, meta)) => {
            let mut status = serde_json::to_value(&meta).unwrap_or_default();
            status["message_count"] = state.store.message_count(id).into();
            serde_json::to_string_pretty(&status)
                .unwrap_or_else(|e| format!("Error: Failed to encode status: {e}"))
        }
        None => format!(
            "No conversation found with session ID: {}",
            params.session_id
        ),
    }
}

/// Implements `get_conversation_history`.
fn conversation_history(state: &Arc<AppState>, arguments: Value) -> String {
    let params: SessionParams = match serde_json::from_value(arguments) {
        Ok(params) => params,
        Err(e) => return format!("Error: Invalid arguments: {e}"),
    };

    let known = params
        .session_id
        .parse::<SessionId>()
        .ok()
        .filter(|id| state.registry.contains(*id));

    match known {
        Some(id) => serde_json::to_string_pretty(&state.store.history(id))
            .unwrap_or_else(|e| format!("Error: Failed to encode history: {e}")),
        None => format!(
            "No conversation found with session ID: {}",
            params.session_id
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pearl_mcp_conversation::ConversationStatus;
    use pearl_mcp_gateway::{
        ChatChoice, ChatCompletion, ChatRequest, GatewayError, PearlApi, RetryConfig,
    };
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    struct ScriptedApi {
        outcomes: Mutex<VecDeque<Result<ChatCompletion, GatewayError>>>,
    }

    #[async_trait]
    impl PearlApi for ScriptedApi {
        async fn create_completion(
            &self,
            _request: &ChatRequest,
        ) -> Result<ChatCompletion, GatewayError> {
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .expect("scripted outcomes exhausted")
        }
    }

    fn scripted_state(outcomes: Vec<Result<ChatCompletion, GatewayError>>) -> Arc<AppState> {
        let api = Arc::new(ScriptedApi {
            outcomes: Mutex::new(outcomes.into()),
        });
        Arc::new(AppState::new(
            api,
            RetryConfig::new(2, Duration::from_millis(1), Duration::from_millis(2)),
        ))
    }

    fn answer(text: &str) -> Result<ChatCompletion, GatewayError> {
        Ok(ChatCompletion {
            choices: vec![ChatChoice {
                message: Message::assistant(text),
            }],
        })
    }

    #[tokio::test]
    async fn fresh_question_creates_session_and_completes() {
        let state = scripted_state(vec![answer("Often dehydration or eye strain.")]);

        let result = dispatch(
            &state,
            "ask_pearl_ai",
            json!({ "question": "What causes a headache?" }),
        )
        .await;

        let parsed: Value = serde_json::from_str(&result).expect("result should be JSON");
        assert_eq!(parsed["status"], "completed");
        assert_eq!(parsed["answer"], "Often dehydration or eye strain.");
        assert_eq!(
            parsed["next_steps"]["continue_conversation"]["tool"],
            "ask_pearl_ai"
        );

        let id: SessionId = parsed["session_id"]
            .as_str()
            .expect("session_id present")
            .parse()
            .expect("session_id parses");
        let meta = state.registry.get(id).expect("session registered");
        assert_eq!(meta.mode, PearlMode::AiOnly);
        assert_eq!(meta.status, ConversationStatus::Completed);

        let history = state.store.history(id);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0], Message::user("What causes a headache?"));
        assert_eq!(history[1].role, pearl_mcp_conversation::MessageRole::Assistant);
    }

    #[tokio::test]
    async fn multi_turn_history_is_folded_before_the_call() {
        let state = scripted_state(vec![answer("Expert answer.")]);

        let result = dispatch(
            &state,
            "ask_expert",
            json!({
                "question": "C",
                "chat_history": [
                    { "role": "user", "content": "A" },
                    { "role": "assistant", "content": "B" },
                    { "role": "user", "content": "C" }
                ]
            }),
        )
        .await;

        let parsed: Value = serde_json::from_str(&result).expect("result should be JSON");
        let id: SessionId = parsed["session_id"].as_str().unwrap().parse().unwrap();

        let history = state.store.history(id);
        assert_eq!(history.len(), 2, "folded question plus assistant reply");
        assert_eq!(
            history[0].content,
            "Customer: A\n\nAI Assistant: B\n\nCustomer: C\n\n"
        );
        assert_eq!(state.registry.get(id).unwrap().mode, PearlMode::Expert);
    }

    #[tokio::test]
    async fn follow_up_appends_to_existing_session() {
        let state = scripted_state(vec![answer("First."), answer("Second.")]);

        let first = dispatch(&state, "ask_pearl_expert", json!({ "question": "Start" })).await;
        let parsed: Value = serde_json::from_str(&first).expect("JSON");
        let session = parsed["session_id"].as_str().unwrap().to_string();

        dispatch(
            &state,
            "ask_pearl_expert",
            json!({ "question": "Follow-up", "session_id": &session }),
        )
        .await;

        let id: SessionId = session.parse().unwrap();
        let history = state.store.history(id);
        assert_eq!(history.len(), 4);
        assert_eq!(history[2], Message::user("Follow-up"));

        let meta = state.registry.get(id).unwrap();
        assert!(meta.last_activity.is_some(), "follow-up refreshes activity");
    }

    #[tokio::test]
    async fn unknown_session_is_an_error_string() {
        let state = scripted_state(vec![]);
        let stray = SessionId::new().to_string();

        let result = dispatch(
            &state,
            "ask_pearl_ai",
            json!({ "question": "hi", "session_id": &stray }),
        )
        .await;

        assert_eq!(
            result,
            format!("Error: No conversation found with session ID: {stray}")
        );
    }

    #[tokio::test]
    async fn gateway_failure_marks_session_failed() {
        let state = scripted_state(vec![
            answer("fine"),
            Err(GatewayError::Api {
                status: 500,
                message: "boom".to_string(),
            }),
        ]);

        let first = dispatch(&state, "ask_expert", json!({ "question": "hi" })).await;
        let parsed: Value = serde_json::from_str(&first).expect("JSON");
        let session = parsed["session_id"].as_str().unwrap().to_string();

        let result = dispatch(
            &state,
            "ask_expert",
            json!({ "question": "again", "session_id": &session }),
        )
        .await;

        assert!(result.starts_with("Error: Failed to connect with expert."));
        assert!(result.contains("500"));

        let id: SessionId = session.parse().unwrap();
        let meta = state.registry.get(id).expect("session registered");
        assert_eq!(meta.status, ConversationStatus::Failed);
        assert!(meta.error.as_deref().is_some_and(|e| !e.is_empty()));
    }

    #[tokio::test]
    async fn exhausted_retries_mark_session_failed() {
        let pending = || {
            Err(GatewayError::ExpertPending {
                detail: String::new(),
            })
        };
        // Retry config allows two attempts; both stay pending.
        let state = scripted_state(vec![answer("fine"), pending(), pending()]);

        let first = dispatch(&state, "ask_pearl_expert", json!({ "question": "hi" })).await;
        let parsed: Value = serde_json::from_str(&first).expect("JSON");
        let session = parsed["session_id"].as_str().unwrap().to_string();

        let result = dispatch(
            &state,
            "ask_pearl_expert",
            json!({ "question": "again", "session_id": &session }),
        )
        .await;

        assert!(result.starts_with("Error: Failed to connect with expert after multiple attempts."));

        let meta = state
            .registry
            .get(session.parse::<SessionId>().unwrap())
            .expect("session registered");
        assert_eq!(meta.status, ConversationStatus::Failed);
        assert!(meta.error.as_deref().is_some_and(|e| e.contains("422")));
    }

    #[tokio::test]
    async fn status_reports_metadata_and_message_count() {
        let state = scripted_state(vec![answer("ok")]);

        let result = dispatch(&state, "ask_pearl_ai", json!({ "question": "hello" })).await;
        let parsed: Value = serde_json::from_str(&result).expect("JSON");
        let session = parsed["session_id"].as_str().unwrap();

        let status = dispatch(
            &state,
            "get_conversation_status",
            json!({ "session_id": session }),
        )
        .await;
        let status: Value = serde_json::from_str(&status).expect("status should be JSON");

        assert_eq!(status["mode"], "pearl-ai");
        assert_eq!(status["status"], "completed");
        assert_eq!(status["message_count"], 2);
        assert!(status.get("created_at").is_some());
    }

    #[tokio::test]
    async fn status_of_unknown_session_is_not_found() {
        let state = scripted_state(vec![]);

        let result = dispatch(
            &state,
            "get_conversation_status",
            json!({ "session_id": "definitely-not-a-session" }),
        )
        .await;

        assert_eq!(
            result,
            "No conversation found with session ID: definitely-not-a-session"
        );
    }

    #[tokio::test]
    async fn history_returns_messages_in_order() {
        let state = scripted_state(vec![answer("reply")]);

        let result = dispatch(&state, "ask_pearl_ai", json!({ "question": "question" })).await;
        let parsed: Value = serde_json::from_str(&result).expect("JSON");
        let session = parsed["session_id"].as_str().unwrap();

        let history = dispatch(
            &state,
            "get_conversation_history",
            json!({ "session_id": session }),
        )
        .await;
        let history: Vec<Message> = serde_json::from_str(&history).expect("history is JSON");

        assert_eq!(history.len(), 2);
        assert_eq!(history[0], Message::user("question"));
        assert_eq!(history[1], Message::assistant("reply"));
    }

    #[tokio::test]
    async fn history_of_unknown_session_is_not_found() {
        let state = scripted_state(vec![]);

        let result = dispatch(
            &state,
            "get_conversation_history",
            json!({ "session_id": SessionId::new().to_string() }),
        )
        .await;

        assert!(result.starts_with("No conversation found with session ID:"));
    }

    #[tokio::test]
    async fn unknown_tool_name_is_an_error_string() {
        let state = scripted_state(vec![]);
        let result = dispatch(&state, "ask_the_void", json!({})).await;
        assert_eq!(result, "Error: Unknown tool: ask_the_void");
    }

    #[test]
    fn definitions_cover_all_five_tools() {
        let names: Vec<String> = definitions().into_iter().map(|d| d.name).collect();
        assert_eq!(
            names,
            vec![
                "ask_pearl_ai",
                "ask_pearl_expert",
                "ask_expert",
                "get_conversation_status",
                "get_conversation_history"
            ]
        );
    }
}
