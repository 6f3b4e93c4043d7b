//! Holder balance changes tool definition.
//!
//! Shows how the balances of a token's holders moved over the period the
//! API reports on.

use rmcp::model::Tool;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{info, instrument};

use crate::core::api::{AnalyticsApi, endpoints};
use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::common::{
    ADDRESS_PATTERN, AMOUNT_DECIMALS, MAX_LIST_ENTRIES, NOT_AVAILABLE, format_opt, lenient,
    parse_response, percent_change, showing_line, text_or, token_label, tool_model,
    validate_address_field,
};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the holder balance changes tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct BalanceChangesParams {
    /// Token contract address.
    #[schemars(description = "Token contract address (0x followed by 40 hex characters)")]
    #[schemars(extend("pattern" = ADDRESS_PATTERN))]
    pub token_address: String,
}

impl BalanceChangesParams {
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
struct BalanceChangesResponse {
    #[serde(default, deserialize_with = "lenient::text")]
    token_address: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    token_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    token_symbol: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    period: Option<String>,
    /// Required.
    #[serde(default, deserialize_with = "lenient::entries")]
    balance_changes: Option<Vec<BalanceChangeEntry>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BalanceChangeEntry {
    #[serde(default, deserialize_with = "lenient::text")]
    address: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    balance_start: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    balance_end: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    change: Option<f64>,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Holder balance changes tool - per-holder balance deltas for a token.
pub struct BalanceChangesTool;

impl BalanceChangesTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_holder_balance_changes";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get recent balance changes for holders of a token: starting balance, ending balance, absolute change and percent change. Lists up to 10 holders.";

    /// Validate, fetch and format.
    #[instrument(skip_all, fields(tool = Self::NAME))]
    pub async fn execute(
        api: &dyn AnalyticsApi,
        args: &Map<String, Value>,
    ) -> Result<String, ToolError> {
        let params = BalanceChangesParams::from_arguments(args)?;
        info!("Fetching holder balance changes for {}", params.token_address);

        let payload = api
            .get(&endpoints::holder_balance_changes(&params.token_address))
            .await?;
        format_balance_changes(payload)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_model::<BalanceChangesParams>(Self::NAME, Self::DESCRIPTION)
    }
}

/// Render a holder-balance-changes payload.
pub fn format_balance_changes(payload: Value) -> Result<String, ToolError> {
    let response: BalanceChangesResponse = parse_response(payload)?;
    let changes = response.balance_changes.ok_or(ToolError::InvalidResponse)?;

    let mut out = format!(
        "Holder Balance Changes: {}\nToken: {}\nPeriod: {}\n",
        token_label(&response.token_name, &response.token_symbol),
        text_or(&response.token_address, NOT_AVAILABLE),
        text_or(&response.period, NOT_AVAILABLE),
    );

    if changes.is_empty() {
        out.push_str("\nNo balance changes found.");
        return Ok(out);
    }

    let shown = changes.len().min(MAX_LIST_ENTRIES);
    out.push_str(&showing_line(shown, changes.len(), "holders"));
    out.push('\n');

    for (rank, entry) in changes.iter().take(MAX_LIST_ENTRIES).enumerate() {
        out.push_str(&format!(
            "\n{}. {}\n   Start Balance: {}\n   End Balance: {}\n   Change: {} ({}%)\n",
            rank + 1,
            text_or(&entry.address, NOT_AVAILABLE),
            format_opt(entry.balance_start, AMOUNT_DECIMALS),
            format_opt(entry.balance_end, AMOUNT_DECIMALS),
            format_opt(entry.change, AMOUNT_DECIMALS),
            percent_change(entry.change, entry.balance_start),
        ));
    }

    Ok(out.trim_end().to_string())
}
