//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure populated
//! from environment variables (optionally via a `.env` file) or defaults.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Base URL of the analytics API.
pub const DEFAULT_BASE_URL: &str = "https://api.tokenanalytics.io";

/// Per-request deadline for analytics API calls.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Main configuration structure for the MCP server.
///
/// Built once at startup and shared read-only with the tools domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Analytics API endpoint configuration.
    pub api: ApiConfig,

    /// External API credentials configuration.
    pub credentials: CredentialsConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl LoggingConfig {
    /// Read `MCP_LOG_LEVEL`.
    ///
    /// Available before the rest of the configuration so the subscriber is
    /// installed before [`Config::from_env`] logs anything.
    pub fn from_env() -> Self {
        std::env::var("MCP_LOG_LEVEL")
            .ok()
            .map(|level| level.trim().to_lowercase())
            .filter(|level| !level.is_empty())
            .map(|level| Self { level })
            .unwrap_or_default()
    }
}

/// Analytics API endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL, without a trailing slash.
    pub base_url: String,

    /// Request deadline in seconds.
    pub timeout_secs: u64,

    /// Value sent in the `User-Agent` header.
    pub user_agent: String,
}

/// Configuration for external API credentials.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Analytics API key. Required by every tool call; its absence is
    /// reported per call rather than at startup.
    pub analytics_api_key: Option<String>,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field(
                "analytics_api_key",
                &self.analytics_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: format!("token-analytics-mcp/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "token-analytics-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig::default(),
            transport: TransportConfig::default(),
            api: ApiConfig::default(),
            credentials: CredentialsConfig::default(),
        }
    }
}

/// Serializes tests that modify process environment variables.
#[cfg(test)]
pub(crate) static ENV_TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        config.logging = LoggingConfig::from_env();
        config.transport = TransportConfig::from_env();

        if let Ok(base_url) = std::env::var("MCP_ANALYTICS_BASE_URL") {
            config.api.base_url = base_url.trim_end_matches('/').to_string();
            info!("Analytics API base URL overridden: {}", config.api.base_url);
        }

        if let Ok(timeout) = std::env::var("MCP_ANALYTICS_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) if secs > 0 => config.api.timeout_secs = secs,
                _ => warn!(
                    "Ignoring invalid MCP_ANALYTICS_TIMEOUT_SECS '{}', using {}s",
                    timeout, DEFAULT_TIMEOUT_SECS
                ),
            }
        }

        // Load analytics API key
        match std::env::var("MCP_ANALYTICS_API_KEY") {
            Ok(api_key) if !api_key.trim().is_empty() => {
                config.credentials.analytics_api_key = Some(api_key);
                info!("Analytics API key loaded from environment");
            }
            _ => warn!(
                "MCP_ANALYTICS_API_KEY not set - every tool call will be rejected \
                 until the server is restarted with a key"
            ),
        }

        config
    }

    /// The configured API key, if any.
    pub fn api_key(&self) -> Option<&str> {
        self.credentials.analytics_api_key.as_deref()
    }
}
