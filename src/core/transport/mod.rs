//! Transports carrying MCP messages to the [`McpServer`](crate::core::McpServer).
//!
//! `MCP_TRANSPORT` picks one of the transports compiled into the binary:
//!
//! | Feature | Transport | Sessions |
//! |---------|-----------|----------|
//! | `stdio` (default) | stdin/stdout | one, for the life of the process |
//! | `tcp` | line-delimited JSON-RPC over TCP | one per connection |
//! | `http` | JSON-RPC over `POST`, plus `GET /health` | none, each request stands alone |
//!
//! All of them share one tool registry and therefore one API client.

mod config;
mod error;
mod service;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "tcp")]
pub mod tcp;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

#[cfg(feature = "tcp")]
pub use config::TcpConfig;

#[cfg(feature = "http")]
pub use config::HttpConfig;
