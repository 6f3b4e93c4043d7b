//! Transport selection and listener settings.
//!
//! `MCP_TRANSPORT` names the transport; the listener variables only matter
//! for the network transports:
//!
//! | Variable | Used by | Default |
//! |----------|---------|---------|
//! | `MCP_BIND_HOST` | tcp, http | `127.0.0.1` |
//! | `MCP_TCP_PORT` | tcp | `7300` |
//! | `MCP_HTTP_PORT` | http | `7301` |
//! | `MCP_HTTP_RPC_PATH` | http | `/rpc` |
//! | `MCP_HTTP_CORS_ORIGIN` | http | unset (no CORS headers) |

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

#[cfg(not(any(feature = "stdio", feature = "tcp", feature = "http")))]
compile_error!("enable at least one transport feature: stdio, tcp or http");

const TRANSPORT_VAR: &str = "MCP_TRANSPORT";

#[cfg(any(feature = "tcp", feature = "http"))]
const BIND_HOST_VAR: &str = "MCP_BIND_HOST";

/// Listeners only accept local clients unless told otherwise.
#[cfg(any(feature = "tcp", feature = "http"))]
pub const DEFAULT_BIND_HOST: &str = "127.0.0.1";

#[cfg(feature = "tcp")]
pub const DEFAULT_TCP_PORT: u16 = 7300;

#[cfg(feature = "http")]
pub const DEFAULT_HTTP_PORT: u16 = 7301;

#[cfg(feature = "http")]
pub const DEFAULT_RPC_PATH: &str = "/rpc";

/// The transport the server runs on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum TransportConfig {
    /// One session over stdin/stdout.
    #[cfg(feature = "stdio")]
    Stdio,

    /// Line-delimited JSON-RPC, one session per TCP connection.
    #[cfg(feature = "tcp")]
    Tcp(TcpConfig),

    /// JSON-RPC over HTTP `POST`.
    #[cfg(feature = "http")]
    Http(HttpConfig),
}

/// TCP listener settings.
#[cfg(feature = "tcp")]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TcpConfig {
    pub host: String,
    pub port: u16,
}

/// HTTP listener settings.
#[cfg(feature = "http")]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,

    /// Path of the JSON-RPC endpoint, always starting with `/`.
    pub rpc_path: String,

    /// Origin allowed by CORS: `*` for any, or one exact origin.
    /// Without it no CORS headers are sent.
    pub allowed_origin: Option<String>,
}

impl Default for TransportConfig {
    /// The first compiled-in transport, in the order stdio, tcp, http.
    fn default() -> Self {
        #[cfg(feature = "stdio")]
        let transport = Self::Stdio;

        #[cfg(all(not(feature = "stdio"), feature = "tcp"))]
        let transport = Self::Tcp(TcpConfig::default());

        #[cfg(all(not(feature = "stdio"), not(feature = "tcp"), feature = "http"))]
        let transport = Self::Http(HttpConfig::default());

        transport
    }
}

impl TransportConfig {
    /// Read `MCP_TRANSPORT` and the matching listener settings.
    ///
    /// An empty value selects the default transport. A name that is unknown,
    /// or whose feature is not compiled in, is logged and also falls back to
    /// the default.
    pub fn from_env() -> Self {
        let requested = std::env::var(TRANSPORT_VAR)
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        match requested.as_str() {
            "" => Self::default(),
            #[cfg(feature = "stdio")]
            "stdio" => Self::Stdio,
            #[cfg(feature = "tcp")]
            "tcp" => Self::Tcp(TcpConfig::from_env()),
            #[cfg(feature = "http")]
            "http" => Self::Http(HttpConfig::from_env()),
            other => {
                let fallback = Self::default();
                warn!(
                    "{} '{}' is unknown or not compiled in, using {}",
                    TRANSPORT_VAR,
                    other,
                    fallback
                );
                fallback
            }
        }
    }
}

/// Short form used in startup logs, e.g. `tcp://127.0.0.1:7300`.
impl fmt::Display for TransportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(feature = "stdio")]
            Self::Stdio => f.write_str("stdio"),
            #[cfg(feature = "tcp")]
            Self::Tcp(tcp) => write!(f, "tcp://{}", tcp.address()),
            #[cfg(feature = "http")]
            Self::Http(http) => write!(f, "http://{}{}", http.address(), http.rpc_path),
        }
    }
}

#[cfg(feature = "tcp")]
impl Default for TcpConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_BIND_HOST.to_string(),
            port: DEFAULT_TCP_PORT,
        }
    }
}

#[cfg(feature = "tcp")]
impl TcpConfig {
    /// Read `MCP_BIND_HOST` and `MCP_TCP_PORT`.
    pub fn from_env() -> Self {
        Self {
            host: bind_host(),
            port: port_from_env("MCP_TCP_PORT", DEFAULT_TCP_PORT),
        }
    }

    /// `host:port` to bind.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(feature = "http")]
impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_BIND_HOST.to_string(),
            port: DEFAULT_HTTP_PORT,
            rpc_path: DEFAULT_RPC_PATH.to_string(),
            allowed_origin: None,
        }
    }
}

#[cfg(feature = "http")]
impl HttpConfig {
    /// Read `MCP_BIND_HOST`, `MCP_HTTP_PORT`, `MCP_HTTP_RPC_PATH` and
    /// `MCP_HTTP_CORS_ORIGIN`.
    pub fn from_env() -> Self {
        let rpc_path = non_empty_var("MCP_HTTP_RPC_PATH")
            .map(|path| {
                if path.starts_with('/') {
                    path
                } else {
                    format!("/{path}")
                }
            })
            .unwrap_or_else(|| DEFAULT_RPC_PATH.to_string());

        Self {
            host: bind_host(),
            port: port_from_env("MCP_HTTP_PORT", DEFAULT_HTTP_PORT),
            rpc_path,
            allowed_origin: non_empty_var("MCP_HTTP_CORS_ORIGIN"),
        }
    }

    /// `host:port` to bind.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(any(feature = "tcp", feature = "http"))]
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(any(feature = "tcp", feature = "http"))]
fn bind_host() -> String {
    non_empty_var(BIND_HOST_VAR).unwrap_or_else(|| DEFAULT_BIND_HOST.to_string())
}

/// Port from `name`; zero or unparsable values are logged and replaced.
#[cfg(any(feature = "tcp", feature = "http"))]
fn port_from_env(name: &str, default: u16) -> u16 {
    let Some(raw) = non_empty_var(name) else {
        return default;
    };
    match raw.parse::<u16>() {
        Ok(port) if port > 0 => port,
        _ => {
            warn!("Ignoring invalid {} '{}', using {}", name, raw, default);
            default
        }
    }
}
