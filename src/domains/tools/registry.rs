//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - A registry of all available tools
//! - Dispatch of tool calls for every transport
//! - Tool metadata for listing

use std::sync::Arc;

use rmcp::model::{CallToolResult, Content, JsonObject, Tool};
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::api::{AnalyticsApi, ApiClient};
use crate::core::config::Config;

use super::ToolError;
use super::definitions::{
    AvgEntryTool, BalanceChangesTool, PortfolioTool, TokenInfoTool, TokenOverlapTool,
    TopHoldersTool,
};

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - manages all available tools.
///
/// Owns the analytics API client shared by every tool. The client only
/// exists when an API key is configured; without one every call is
/// rejected before any other check.
pub struct ToolRegistry {
    api: Option<Arc<dyn AnalyticsApi>>,
}

impl ToolRegistry {
    /// Create a new tool registry from the server configuration.
    pub fn new(config: Arc<Config>) -> Self {
        let api = config.api_key().map(|key| {
            debug!("Creating analytics API client for {}", config.api.base_url);
            Arc::new(ApiClient::new(&config.api, key)) as Arc<dyn AnalyticsApi>
        });
        Self { api }
    }

    /// Create a registry backed by the given API (or none).
    pub fn with_api(api: Option<Arc<dyn AnalyticsApi>>) -> Self {
        Self { api }
    }

    /// Get all tool names.
    pub fn tool_names() -> Vec<&'static str> {
        vec![
            TokenInfoTool::NAME,
            TopHoldersTool::NAME,
            BalanceChangesTool::NAME,
            PortfolioTool::NAME,
            AvgEntryTool::NAME,
            TokenOverlapTool::NAME,
        ]
    }

    /// Get all tools as Tool models (metadata).
    ///
    /// This is the single source of truth for all available tools.
    /// Every transport uses this to get tool metadata.
    pub fn get_all_tools() -> Vec<Tool> {
        vec![
            TokenInfoTool::to_tool(),
            TopHoldersTool::to_tool(),
            BalanceChangesTool::to_tool(),
            PortfolioTool::to_tool(),
            AvgEntryTool::to_tool(),
            TokenOverlapTool::to_tool(),
        ]
    }

    /// Dispatch a tool call to the matching tool.
    ///
    /// Checks run in a fixed order: credential, tool name, arguments, then
    /// the upstream request. A failing check stops the call before any
    /// request is sent. Absent or `null` arguments count as an empty object.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Option<Value>,
    ) -> Result<CallToolResult, ToolError> {
        let Some(api) = self.api.as_deref() else {
            warn!("Rejecting call to '{}': no API key configured", name);
            return Err(ToolError::MissingCredential);
        };

        if !Self::tool_names().contains(&name) {
            warn!("Unknown tool requested: {}", name);
            return Err(ToolError::not_found(name));
        }

        let args = argument_object(arguments)?;
        let text = match name {
            TokenInfoTool::NAME => TokenInfoTool::execute(api, &args).await?,
            TopHoldersTool::NAME => TopHoldersTool::execute(api, &args).await?,
            BalanceChangesTool::NAME => BalanceChangesTool::execute(api, &args).await?,
            PortfolioTool::NAME => PortfolioTool::execute(api, &args).await?,
            AvgEntryTool::NAME => AvgEntryTool::execute(api, &args).await?,
            TokenOverlapTool::NAME => TokenOverlapTool::execute(api, &args).await?,
            _ => return Err(ToolError::not_found(name)),
        };

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

fn argument_object(arguments: Option<Value>) -> Result<JsonObject, ToolError> {
    match arguments {
        None | Some(Value::Null) => Ok(JsonObject::new()),
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(ToolError::invalid_arguments(vec![
            "arguments: expected a JSON object".to_string(),
        ])),
    }
}
