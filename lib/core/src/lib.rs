//! Core domain types for the Pearl MCP server.
//!
//! This crate provides the foundational types shared by every layer:
//! session identifiers, the Pearl service-tier enum, and the `Result`
//! alias used for layered error context.

pub mod error;
pub mod id;
pub mod mode;

pub use error::Result;
pub use id::{ParseSessionIdError, SessionId};
pub use mode::PearlMode;
