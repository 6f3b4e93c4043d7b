//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the MCP server,
//! including error handling, configuration, the analytics API client,
//! server lifecycle management, and transport layer abstractions.

pub mod api;
pub mod config;
pub mod error;
pub mod security;
pub mod server;
pub mod transport;

pub use api::{AnalyticsApi, ApiClient, ApiError};
pub use config::Config;
pub use error::{Error, Result};
pub use security::{AddressError, validate_address};
pub use server::McpServer;
pub use transport::{TransportConfig, TransportService};
