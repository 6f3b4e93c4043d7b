//! Starts the transport selected in the configuration.

use tracing::info;

use super::TransportConfig;
use crate::core::McpServer;

#[cfg(feature = "stdio")]
use super::stdio::StdioTransport;

#[cfg(feature = "tcp")]
use super::tcp::TcpTransport;

#[cfg(feature = "http")]
use super::http::HttpTransport;

/// Runs an [`McpServer`] on the configured transport.
pub struct TransportService {
    config: TransportConfig,
}

impl TransportService {
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }

    /// Serve until the transport stops.
    ///
    /// STDIO returns once its session ends; the network transports only
    /// return on error.
    pub async fn run(self, server: McpServer) -> crate::core::Result<()> {
        info!("Starting transport: {}", self.config);

        match self.config {
            #[cfg(feature = "stdio")]
            TransportConfig::Stdio => StdioTransport::run(server).await?,
            #[cfg(feature = "tcp")]
            TransportConfig::Tcp(tcp) => TcpTransport::new(tcp).run(server).await?,
            #[cfg(feature = "http")]
            TransportConfig::Http(http) => HttpTransport::new(http).run(server).await?,
        }

        Ok(())
    }
}
