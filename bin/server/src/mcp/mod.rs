//! MCP protocol plumbing: JSON-RPC 2.0 types, the method router, and the
//! stdio and SSE transports.

pub mod router;
pub mod sse;
pub mod stdio;
pub mod types;
