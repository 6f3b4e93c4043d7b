//! Average entry price tool definition.
//!
//! Estimates what holders paid for a token and their unrealized profit or
//! loss at the current price.

use rmcp::model::Tool;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{info, instrument};

use crate::core::api::{AnalyticsApi, endpoints};
use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::common::{
    ADDRESS_PATTERN, AMOUNT_DECIMALS, MAX_LIST_ENTRIES, NOT_AVAILABLE, NOT_PROVIDED, PRICE_DECIMALS,
    format_opt, format_percent, format_usd, lenient, parse_response, profit_loss_percent,
    showing_line, text_or, token_label, tool_model, validate_address_field,
};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the average entry price tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AvgEntryParams {
    /// Token contract address.
    #[schemars(description = "Token contract address (0x followed by 40 hex characters)")]
    #[schemars(extend("pattern" = ADDRESS_PATTERN))]
    pub token_address: String,
}

impl AvgEntryParams {
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
struct AvgEntryResponse {
    #[serde(default, deserialize_with = "lenient::text")]
    token_address: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    token_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    token_symbol: Option<String>,
    /// Required.
    summary: Option<EntrySummary>,
    #[serde(default, deserialize_with = "lenient::list")]
    holders: Option<Vec<HolderEntry>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntrySummary {
    #[serde(default, deserialize_with = "lenient::number")]
    avg_entry_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    current_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    holders_analyzed: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    total_balance: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HolderEntry {
    #[serde(default, deserialize_with = "lenient::text")]
    address: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    balance: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    avg_entry_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    current_price: Option<f64>,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Average entry price tool - entry price and P/L analysis for a token.
pub struct AvgEntryTool;

impl AvgEntryTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_avg_entry_price";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Analyze the average entry price of a token's holders against the current price, with per-holder unrealized profit/loss percentages. Lists up to 10 holders.";

    /// Validate, fetch and format.
    #[instrument(skip_all, fields(tool = Self::NAME))]
    pub async fn execute(
        api: &dyn AnalyticsApi,
        args: &Map<String, Value>,
    ) -> Result<String, ToolError> {
        let params = AvgEntryParams::from_arguments(args)?;
        info!("Fetching average entry prices for {}", params.token_address);

        let payload = api.get(&endpoints::avg_entry(&params.token_address)).await?;
        format_avg_entry(payload)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_model::<AvgEntryParams>(Self::NAME, Self::DESCRIPTION)
    }
}

/// Render an avg-entry payload.
pub fn format_avg_entry(payload: Value) -> Result<String, ToolError> {
    let response: AvgEntryResponse = parse_response(payload)?;
    let summary = response.summary.ok_or(ToolError::InvalidResponse)?;

    let mut out = format!(
        "Average Entry Price Analysis: {}\nToken: {}\n\nSummary\n",
        token_label(&response.token_name, &response.token_symbol),
        text_or(&response.token_address, NOT_AVAILABLE),
    );
    out.push_str(&format!(
        "  Average Entry Price: {}\n  Current Price: {}\n  Unrealized P/L: {}\n  Holders Analyzed: {}\n  Total Balance: {}\n",
        format_usd(summary.avg_entry_price, PRICE_DECIMALS),
        format_usd(summary.current_price, PRICE_DECIMALS),
        format_percent(profit_loss_percent(summary.current_price, summary.avg_entry_price)),
        format_opt(summary.holders_analyzed, 0),
        format_opt(summary.total_balance, AMOUNT_DECIMALS),
    ));

    let holders = response.holders.unwrap_or_default();
    if holders.is_empty() {
        out.push_str(&format!("\nHolder Breakdown: {NOT_PROVIDED}"));
        return Ok(out);
    }

    let shown = holders.len().min(MAX_LIST_ENTRIES);
    out.push_str(&format!("\nHolder Breakdown ({})\n", showing_line(shown, holders.len(), "holders")));

    for (rank, holder) in holders.iter().take(MAX_LIST_ENTRIES).enumerate() {
        let current_price = holder.current_price.or(summary.current_price);
        out.push_str(&format!(
            "\n{}. {}\n   Balance: {}\n   Avg Entry Price: {}\n   P/L: {}\n",
            rank + 1,
            text_or(&holder.address, NOT_AVAILABLE),
            format_opt(holder.balance, AMOUNT_DECIMALS),
            format_usd(holder.avg_entry_price, PRICE_DECIMALS),
            format_percent(profit_loss_percent(current_price, holder.avg_entry_price)),
        ));
    }

    Ok(out.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::testing::RecordingApi;
    use serde_json::json;

    const UNI: &str = "0x1f9840a85d5aF5bf1D1762F925BDADdC4201F984";
    const HOLDER: &str = "0x000000000000000000000000000000000000dEaD";

    #[test]
    fn test_format_summary_and_holder_pnl() {
        let text = format_avg_entry(json!({
            "tokenSymbol": "UNI",
            "summary": {
                "avgEntryPrice": 4.0,
                "currentPrice": 5.0,
                "holdersAnalyzed": 1250,
                "totalBalance": "1500000"
            },
            "holders": [
                { "address": HOLDER, "balance": 1000, "avgEntryPrice": 2.5 },
                { "address": HOLDER, "balance": 10, "avgEntryPrice": 8.0, "currentPrice": 6.0 },
                { "address": HOLDER, "balance": 10 }
            ]
        }))
        .unwrap();

        assert!(text.contains("Average Entry Price Analysis: UNI"));
        assert!(text.contains("Average Entry Price: $4.000000"));
        assert!(text.contains("Current Price: $5.000000"));
        assert!(text.contains("Unrealized P/L: 25.00%"));
        assert!(text.contains("Holders Analyzed: 1,250"));
        assert!(text.contains("Total Balance: 1,500,000.00"));
        // Falls back to the summary's current price
        assert!(text.contains("P/L: 100.00%"));
        // Uses the holder's own current price when present
        assert!(text.contains("P/L: -25.00%"));
        // No entry price
        assert!(text.contains("Avg Entry Price: N/A\n   P/L: N/A"));
    }

    #[test]
    fn test_format_zero_entry_price_has_no_pnl() {
        let text = format_avg_entry(json!({
            "summary": { "avgEntryPrice": 0, "currentPrice": 1.0 }
        }))
        .unwrap();
        assert!(text.contains("Unrealized P/L: N/A"));
        assert!(text.contains("Holder Breakdown: Not available"));
    }

    #[test]
    fn test_format_ignores_malformed_holder_breakdown() {
        let text = format_avg_entry(json!({
            "summary": { "avgEntryPrice": 2.0, "currentPrice": 3.0 },
            "holders": "unavailable"
        }))
        .unwrap();

        assert!(text.contains("Unrealized P/L: 50.00%"));
        assert!(text.contains("Holder Breakdown: Not available"));
    }

    #[test]
    fn test_format_truncates_holders() {
        let holders: Vec<_> = (0..14)
            .map(|i| json!({ "address": format!("0x{:040x}", i), "avgEntryPrice": 1.0 }))
            .collect();
        let text = format_avg_entry(json!({ "summary": {}, "holders": holders })).unwrap();

        assert!(text.contains("Showing 10 of 14 holders"));
        assert!(!text.contains("\n11. "));
    }

    #[test]
    fn test_format_requires_summary_object() {
        assert!(matches!(
            format_avg_entry(json!({ "holders": [] })),
            Err(ToolError::InvalidResponse)
        ));
        assert!(matches!(
            format_avg_entry(json!({ "summary": "pending" })),
            Err(ToolError::InvalidResponse)
        ));
    }

    #[tokio::test]
    async fn test_execute_requests_avg_entry_endpoint() {
        let api = RecordingApi::returning(json!({ "summary": {} }));
        let args = json!({ "token_address": UNI });

        AvgEntryTool::execute(&api, args.as_object().unwrap())
            .await
            .unwrap();

        assert_eq!(api.calls(), vec![format!("/api/token/avg-entry/{UNI}")]);
    }
}
