//! Errors that stop the server.
//!
//! Tool failures never end up here: they are answered to the client as
//! JSON-RPC errors. This type covers startup and transport failures only.

use thiserror::Error;

/// A specialized Result type for running the server.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal server error.
#[derive(Debug, Error)]
pub enum Error {
    /// A setting that was read but cannot be applied.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The transport failed to start or stopped abnormally.
    #[error(transparent)]
    Transport(#[from] super::transport::TransportError),
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
