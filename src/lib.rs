//! Token Analytics MCP Server Library
//!
//! This crate exposes a third-party token analytics API to MCP clients as a
//! set of read-only tools: token information, top holders, holder balance
//! changes, wallet portfolios, average entry prices and the holder overlap
//! between two tokens.
//!
//! # Architecture
//!
//! - **core**: Configuration, error handling, the analytics API client, the
//!   MCP server handler and the transports
//! - **domains**: Business logic organized by bounded contexts
//!   - **tools**: Argument validation, API requests and text formatting
//!
//! # Example
//!
//! ```rust,no_run
//! use token_analytics_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config.clone());
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
