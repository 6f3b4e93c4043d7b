//! Tool-specific error types.

use rmcp::{ErrorData as McpError, model::ErrorCode};
use thiserror::Error;

use crate::core::api::ApiError;

/// Errors that can occur during tool operations.
///
/// Each variant maps onto one JSON-RPC error code through
/// `From<ToolError> for McpError`.
#[derive(Debug, Error)]
pub enum ToolError {
    /// No API key is configured.
    #[error("Analytics API key is not configured (set MCP_ANALYTICS_API_KEY)")]
    MissingCredential,

    /// The requested tool was not found.
    #[error("Unknown tool: {0}")]
    NotFound(String),

    /// One or more arguments failed validation. Holds one entry per field.
    #[error("Invalid arguments: {}", .0.join("; "))]
    InvalidArguments(Vec<String>),

    /// The upstream request failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A 2xx payload did not have the expected shape.
    #[error("Invalid response format from API")]
    InvalidResponse,

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "invalid arguments" error from per-field violations.
    pub fn invalid_arguments(violations: Vec<String>) -> Self {
        Self::InvalidArguments(violations)
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// JSON-RPC error code reported to the client.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MissingCredential => ErrorCode::INVALID_REQUEST,
            Self::NotFound(_) => ErrorCode::METHOD_NOT_FOUND,
            Self::InvalidArguments(_) => ErrorCode::INVALID_PARAMS,
            Self::Api(_) | Self::InvalidResponse | Self::Internal(_) => ErrorCode::INTERNAL_ERROR,
        }
    }
}

impl From<ToolError> for McpError {
    fn from(e: ToolError) -> Self {
        McpError::new(e.code(), e.to_string(), None)
    }
}
