//! JSON-RPC method router.
//!
//! Maps MCP methods onto the tool façade, resources, and prompts. Tool
//! failures come back as text content rather than protocol errors, so
//! the calling LLM can react conversationally.

use crate::mcp::types::{
    error_codes, JsonRpcRequest, JsonRpcResponse, MCP_PROTOCOL_VERSION, MCP_SERVER_NAME,
};
use crate::state::AppState;
use crate::{prompts, resources, tools};
use serde_json::{json, Value};
use std::sync::Arc;

/// Handles one request. Returns `None` for notifications, which get no
/// response.
pub async fn handle_request(state: &Arc<AppState>, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
    let id = request.id?;
    let params = request.params.unwrap_or_else(|| json!({}));

    let response = match request.method.as_str() {
        "initialize" => JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": MCP_PROTOCOL_VERSION,
                "capabilities": {
                    "tools": {},
                    "resources": {},
                    "prompts": {},
                },
                "serverInfo": {
                    "name": MCP_SERVER_NAME,
                    "version": env!("CARGO_PKG_VERSION"),
                },
            }),
        ),
        "ping" => JsonRpcResponse::success(id, json!({})),
        "tools/list" => JsonRpcResponse::success(id, json!({ "tools": tools::definitions() })),
        "tools/call" => call_tool(state, id, params).await,
        "resources/list" => {
            JsonRpcResponse::success(id, json!({ "resources": resources::definitions() }))
        }
        "resources/read" => read_resource(id, &params),
        "prompts/list" => JsonRpcResponse::success(id, json!({ "prompts": prompts::definitions() })),
        "prompts/get" => get_prompt(id, &params),
        method => {
            tracing::debug!(method, "unknown method");
            JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method not found: {method}"),
            )
        }
    };

    Some(response)
}

async fn call_tool(state: &Arc<AppState>, id: Value, params: Value) -> JsonRpcResponse {
    let Some(name) = params.get("name").and_then(Value::as_str) else {
        return JsonRpcResponse::error(
            id,
            error_codes::INVALID_PARAMS,
            "tools/call requires a tool name",
        );
    };
    let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

    tracing::info!(tool = name, "tool call");
    let text = tools::dispatch(state, name, arguments).await;

    JsonRpcResponse::success(
        id,
        json!({
            "content": [{ "type": "text", "text": text }],
            "isError": false,
        }),
    )
}

fn read_resource(id: Value, params: &Value) -> JsonRpcResponse {
    let Some(uri) = params.get("uri").and_then(Value::as_str) else {
        return JsonRpcResponse::error(
            id,
            error_codes::INVALID_PARAMS,
            "resources/read requires a uri",
        );
    };

    match resources::read(uri) {
        Some((mime_type, text)) => JsonRpcResponse::success(
            id,
            json!({
                "contents": [{ "uri": uri, "mimeType": mime_type, "text": text }],
            }),
        ),
        None => JsonRpcResponse::error(
            id,
            error_codes::INVALID_PARAMS,
            format!("Unknown resource: {uri}"),
        ),
    }
}

fn get_prompt(id: Value, params: &Value) -> JsonRpcResponse {
    let Some(name) = params.get("name").and_then(Value::as_str) else {
        return JsonRpcResponse::error(
            id,
            error_codes::INVALID_PARAMS,
            "prompts/get requires a prompt name",
        );
    };

    match prompts::get(name) {
        Some(prompt) => JsonRpcResponse::success(
            id,
            json!({
                "description": prompt.description,
                "messages": prompt.messages,
            }),
        ),
        None => JsonRpcResponse::error(
            id,
            error_codes::INVALID_PARAMS,
            format!("Unknown prompt: {name}"),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pearl_mcp_gateway::{ChatCompletion, ChatRequest, GatewayError, PearlApi, RetryConfig};
    use async_trait::async_trait;
    use std::time::Duration;

    struct NoApi;

    #[async_trait]
    impl PearlApi for NoApi {
        async fn create_completion(
            &self,
            _request: &ChatRequest,
        ) -> Result<ChatCompletion, GatewayError> {
            Err(GatewayError::Network {
                reason: "not wired in this test".to_string(),
            })
        }
    }

    fn test_state() -> Arc<AppState> {
        Arc::new(AppState::new(
            Arc::new(NoApi),
            RetryConfig::new(1, Duration::from_millis(1), Duration::from_millis(1)),
        ))
    }

    fn request(method: &str, id: Option<Value>, params: Option<Value>) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id,
            method: method.to_string(),
            params,
        }
    }

    #[tokio::test]
    async fn initialize_announces_capabilities() {
        let state = test_state();
        let response = handle_request(&state, request("initialize", Some(json!(1)), None))
            .await
            .expect("response");

        let result = response.result.expect("result");
        assert_eq!(result["protocolVersion"], MCP_PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], "pearlapi");
        assert!(result["capabilities"].get("tools").is_some());
    }

    #[tokio::test]
    async fn notifications_get_no_response() {
        let state = test_state();
        let response =
            handle_request(&state, request("notifications/initialized", None, None)).await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn tools_list_names_all_tools() {
        let state = test_state();
        let response = handle_request(&state, request("tools/list", Some(json!(2)), None))
            .await
            .expect("response");

        let tools = response.result.expect("result")["tools"]
            .as_array()
            .expect("array")
            .len();
        assert_eq!(tools, 5);
    }

    #[tokio::test]
    async fn tool_failures_are_text_content_not_protocol_errors() {
        let state = test_state();
        let response = handle_request(
            &state,
            request(
                "tools/call",
                Some(json!(3)),
                Some(json!({ "name": "ask_pearl_ai", "arguments": { "question": "hi" } })),
            ),
        )
        .await
        .expect("response");

        assert!(response.error.is_none());
        let result = response.result.expect("result");
        let text = result["content"][0]["text"].as_str().expect("text");
        assert!(text.starts_with("Error:"));
    }

    #[tokio::test]
    async fn unknown_method_is_method_not_found() {
        let state = test_state();
        let response = handle_request(&state, request("bogus/method", Some(json!(4)), None))
            .await
            .expect("response");

        assert_eq!(
            response.error.expect("error").code,
            error_codes::METHOD_NOT_FOUND
        );
    }

    #[tokio::test]
    async fn resources_read_round_trip() {
        let state = test_state();
        let response = handle_request(
            &state,
            request(
                "resources/read",
                Some(json!(5)),
                Some(json!({ "uri": "pearl://modes" })),
            ),
        )
        .await
        .expect("response");

        let result = response.result.expect("result");
        assert_eq!(result["contents"][0]["uri"], "pearl://modes");
        assert!(result["contents"][0]["text"]
            .as_str()
            .expect("text")
            .contains("pearl-ai-expert"));
    }

    #[tokio::test]
    async fn prompts_get_returns_user_message() {
        let state = test_state();
        let response = handle_request(
            &state,
            request(
                "prompts/get",
                Some(json!(6)),
                Some(json!({ "name": "ask_legal_question" })),
            ),
        )
        .await
        .expect("response");

        let result = response.result.expect("result");
        assert_eq!(result["messages"][0]["role"], "user");
    }
}
