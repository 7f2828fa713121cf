//! Upstream call gateway for the Pearl MCP server.
//!
//! This crate wraps the Pearl question-answering API:
//!
//! - **Wire types**: the chat-completion request/response contract
//! - **`PearlApi`**: the transport seam, implemented over reqwest in
//!   production and by scripted mocks in tests
//! - **`Gateway`**: bounded retry with randomized exponential backoff,
//!   scoped to the "expert verification in progress" failure class

pub mod api;
pub mod error;
pub mod gateway;
pub mod retry;

pub use api::{
    CallMetadata, ChatChoice, ChatCompletion, ChatRequest, HttpPearlApi, PEARL_MODEL, PearlApi,
};
pub use error::GatewayError;
pub use gateway::Gateway;
pub use retry::RetryConfig;
