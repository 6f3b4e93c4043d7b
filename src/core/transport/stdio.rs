//! STDIO transport: a single MCP session on stdin/stdout.
//!
//! stdout carries protocol frames only, which is why logging goes to stderr.

use rmcp::ServiceExt;
use tracing::info;

use super::{TransportError, TransportResult};
use crate::core::McpServer;

/// STDIO transport handler.
pub struct StdioTransport;

impl StdioTransport {
    /// Serve one session until the client closes stdin.
    pub async fn run(server: McpServer) -> TransportResult<()> {
        let session = server
            .serve(rmcp::transport::stdio())
            .await
            .map_err(TransportError::session)?;
        info!("Serving analytics tools on stdin/stdout");

        let reason = session
            .waiting()
            .await
            .map_err(|e| TransportError::serve("stdio", e))?;
        info!("STDIO session ended: {:?}", reason);

        Ok(())
    }
}
