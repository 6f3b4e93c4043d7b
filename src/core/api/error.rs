//! API client error types.

use std::time::Duration;

use thiserror::Error;

/// Result type for API client operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors that can occur while talking to the analytics API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The API answered with a non-2xx status.
    #[error("API request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    /// The request did not complete before the deadline.
    #[error("API request timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    /// Connection, TLS, or other transport failure.
    #[error("API request failed: {0}")]
    Transport(String),

    /// A 2xx response whose body is not valid JSON.
    #[error("Invalid JSON in API response: {0}")]
    InvalidBody(String),

    /// The request URL could not be built.
    #[error("Failed to encode request: {0}")]
    Encoding(String),
}

impl ApiError {
    /// Create a status error.
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Whether this error was caused by the request deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() {
            Self::Transport(format!("connection failed: {e}"))
        } else {
            Self::Transport(e.to_string())
        }
    }
}

impl From<serde_urlencoded::ser::Error> for ApiError {
    fn from(e: serde_urlencoded::ser::Error) -> Self {
        Self::Encoding(e.to_string())
    }
}
