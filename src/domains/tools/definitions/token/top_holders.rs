//! Top holders tool definition.
//!
//! Lists the largest holders of a token, in the order the API ranks them.

use rmcp::model::Tool;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{info, instrument};

use crate::core::api::{AnalyticsApi, endpoints};
use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::common::{
    ADDRESS_PATTERN, AMOUNT_DECIMALS, MAX_LIST_ENTRIES, NOT_AVAILABLE, format_opt,
    format_percent, format_usd, lenient, parse_response, showing_line, text_or, token_label,
    tool_model, validate_address_field,
};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the top holders tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TopHoldersParams {
    /// Token contract address.
    #[schemars(description = "Token contract address (0x followed by 40 hex characters)")]
    #[schemars(extend("pattern" = ADDRESS_PATTERN))]
    pub token_address: String,
}

impl TopHoldersParams {
    /// Validate raw tool arguments.
    pub fn from_arguments(args: &Map<String, Value>) -> Result<Self, ToolError> {
        Ok(Self {
            token_address: validate_address_field(args, "token_address")?,
        })
    }
}

// ============================================================================
// Response Model
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TopHoldersResponse {
    #[serde(default, deserialize_with = "lenient::text")]
    token_address: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    token_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    token_symbol: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    total_holders: Option<f64>,
    /// Required.
    #[serde(default, deserialize_with = "lenient::entries")]
    holders: Option<Vec<HolderEntry>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HolderEntry {
    #[serde(default, deserialize_with = "lenient::text")]
    address: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    balance: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    percentage: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    value_usd: Option<f64>,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Top holders tool - the largest holders of a token.
pub struct TopHoldersTool;

impl TopHoldersTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_top_holders";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get the top holders of a token with their balances, share of supply and USD value. Lists up to 10 holders.";

    /// Validate, fetch and format.
    #[instrument(skip_all, fields(tool = Self::NAME))]
    pub async fn execute(
        api: &dyn AnalyticsApi,
        args: &Map<String, Value>,
    ) -> Result<String, ToolError> {
        let params = TopHoldersParams::from_arguments(args)?;
        info!("Fetching top holders for {}", params.token_address);

        let payload = api.get(&endpoints::top_holders(&params.token_address)).await?;
        format_top_holders(payload)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_model::<TopHoldersParams>(Self::NAME, Self::DESCRIPTION)
    }
}

/// Render a top-holders payload.
pub fn format_top_holders(payload: Value) -> Result<String, ToolError> {
    let response: TopHoldersResponse = parse_response(payload)?;
    let holders = response.holders.ok_or(ToolError::InvalidResponse)?;

    let mut out = format!(
        "Top Holders: {}\nToken: {}\nTotal Holders: {}\n",
        token_label(&response.token_name, &response.token_symbol),
        text_or(&response.token_address, NOT_AVAILABLE),
        format_opt(response.total_holders, 0),
    );

    if holders.is_empty() {
        out.push_str("\nNo holders found.");
        return Ok(out);
    }

    let shown = holders.len().min(MAX_LIST_ENTRIES);
    out.push_str(&showing_line(shown, holders.len(), "holders"));
    out.push('\n');

    for (rank, holder) in holders.iter().take(MAX_LIST_ENTRIES).enumerate() {
        out.push_str(&format!(
            "\n{}. {}\n   Balance: {}\n   Share of Supply: {}\n   Value: {}\n",
            rank + 1,
            text_or(&holder.address, NOT_AVAILABLE),
            format_opt(holder.balance, AMOUNT_DECIMALS),
            format_percent(holder.percentage),
            format_usd(holder.value_usd, AMOUNT_DECIMALS),
        ));
    }

    Ok(out.trim_end().to_string())
}
