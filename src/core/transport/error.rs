//! Transport error types.

use std::fmt::Display;

use thiserror::Error;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Failures while starting or running a transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The listener address could not be bound.
    #[error("Cannot listen on {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// The MCP handshake with the client failed.
    #[error("MCP session could not start: {0}")]
    Session(String),

    /// A running transport stopped with an error.
    #[error("{transport} transport stopped: {reason}")]
    Serve {
        transport: &'static str,
        reason: String,
    },
}

impl TransportError {
    pub fn bind(address: impl Into<String>, source: std::io::Error) -> Self {
        Self::Bind {
            address: address.into(),
            source,
        }
    }

    pub fn session(err: impl Display) -> Self {
        Self::Session(err.to_string())
    }

    pub fn serve(transport: &'static str, err: impl Display) -> Self {
        Self::Serve {
            transport,
            reason: err.to_string(),
        }
    }
}
