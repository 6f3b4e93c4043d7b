//! Tools domain module.
//!
//! This module handles all tool-related functionality for the MCP server.
//! Each tool validates its arguments, issues one request to the analytics
//! API and renders the JSON answer as plain text.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `registry.rs` - Central tool registry and dispatch for every transport
//! - `error.rs` - Tool-specific error types and their JSON-RPC codes
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/token/` or `definitions/wallet/`
//! 2. Define params with `from_arguments()`, `execute()` and `to_tool()`
//! 3. Export it in the group's `mod.rs`
//! 4. Register it in `registry.rs` (names, metadata and dispatch)

pub mod definitions;
mod error;
mod registry;
#[cfg(test)]
pub(crate) mod testing;

pub use error::ToolError;
pub use registry::ToolRegistry;
