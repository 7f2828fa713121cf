//! SSE transport: JSON-RPC over HTTP POST with responses pushed down a
//! server-sent event stream.
//!
//! `GET /sse` opens the stream; its first event names the message
//! endpoint, including the transport session the client must POST to.
//! `POST /messages/` accepts requests and returns 202 immediately; the
//! matching responses arrive as `message` events on the stream.

use crate::error::ServerError;
use crate::mcp::router;
use crate::mcp::types::JsonRpcRequest;
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::Stream;
use serde::Deserialize;
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::StreamExt;
use ulid::Ulid;

/// Shared state for the SSE transport.
#[derive(Clone)]
struct SseState {
    app: Arc<AppState>,
    /// Open event streams, keyed by transport session ID.
    streams: Arc<Mutex<HashMap<String, mpsc::UnboundedSender<Event>>>>,
}

#[derive(Debug, Deserialize)]
struct MessagesQuery {
    session_id: String,
}

/// Serves MCP over SSE on the given port.
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, port: u16) -> Result<(), ServerError> {
    let sse_state = SseState {
        app: state,
        streams: Arc::new(Mutex::new(HashMap::new())),
    };

    let app = Router::new()
        .route("/sse", get(open_stream))
        .route("/messages/", post(receive_message))
        .with_state(sse_state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .map_err(|e| ServerError::Io {
            reason: e.to_string(),
        })?;

    tracing::info!(port, "listening for SSE connections");

    axum::serve(listener, app.into_make_service())
        .await
        .map_err(|e| ServerError::Io {
            reason: e.to_string(),
        })
}

async fn open_stream(
    State(state): State<SseState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let session_id = Ulid::new().to_string();
    let (tx, rx) = mpsc::unbounded_channel::<Event>();

    let endpoint = format!("/messages/?session_id={session_id}");
    let _ = tx.send(Event::default().event("endpoint").data(endpoint));

    state
        .streams
        .lock()
        .unwrap()
        .insert(session_id.clone(), tx);

    tracing::info!(session_id, "SSE stream opened");

    let stream = UnboundedReceiverStream::new(rx).map(Ok);
    Sse::new(stream).keep_alive(KeepAlive::default())
}

async fn receive_message(
    State(state): State<SseState>,
    Query(query): Query<MessagesQuery>,
    Json(request): Json<JsonRpcRequest>,
) -> StatusCode {
    let tx = {
        let streams = state.streams.lock().unwrap();
        streams.get(&query.session_id).cloned()
    };
    let Some(tx) = tx else {
        return StatusCode::NOT_FOUND;
    };

    let app = Arc::clone(&state.app);
    tokio::spawn(async move {
        if let Some(response) = router::handle_request(&app, request).await {
            match Event::default().event("message").json_data(&response) {
                Ok(event) => {
                    let _ = tx.send(event);
                }
                Err(e) => tracing::error!(error = %e, "failed to encode SSE event"),
            }
        }
    });

    StatusCode::ACCEPTED
}
