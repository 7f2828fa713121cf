//! stdio transport: newline-delimited JSON-RPC on stdin/stdout.
//!
//! Each request is handled in its own spawned task, so a slow upstream
//! call (or its retry backoff) never blocks other invocations. A single
//! writer task owns stdout; logs go to stderr so stdout stays
//! protocol-clean.

use crate::error::ServerError;
use crate::mcp::router;
use crate::mcp::types::{error_codes, JsonRpcRequest, JsonRpcResponse};
use crate::state::AppState;
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

/// Serves MCP over stdin/stdout until stdin closes.
///
/// # Errors
///
/// Returns an error if reading stdin fails.
pub async fn serve(state: Arc<AppState>) -> Result<(), ServerError> {
    let stdin = tokio::io::stdin();
    let mut lines = BufReader::new(stdin).lines();

    let (tx, mut rx) = mpsc::unbounded_channel::<JsonRpcResponse>();

    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(response) = rx.recv().await {
            let mut line = match serde_json::to_string(&response) {
                Ok(line) => line,
                Err(e) => {
                    tracing::error!(error = %e, "failed to encode response");
                    continue;
                }
            };
            line.push('\n');
            if stdout.write_all(line.as_bytes()).await.is_err() {
                break;
            }
            let _ = stdout.flush().await;
        }
    });

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| ServerError::Io {
            reason: e.to_string(),
        })?
    {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match serde_json::from_str::<JsonRpcRequest>(trimmed) {
            Ok(request) => {
                let state = Arc::clone(&state);
                let tx = tx.clone();
                tokio::spawn(async move {
                    if let Some(response) = router::handle_request(&state, request).await {
                        let _ = tx.send(response);
                    }
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "unparseable request line");
                let _ = tx.send(JsonRpcResponse::error(
                    Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Parse error: {e}"),
                ));
            }
        }
    }

    tracing::info!("stdin closed, shutting down");
    drop(tx);
    let _ = writer.await;
    Ok(())
}
