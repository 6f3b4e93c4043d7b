//! Token holder overlap tool definition.
//!
//! Compares two tokens and lists the addresses holding both.

use rmcp::model::Tool;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{info, instrument};

use crate::core::api::{AnalyticsApi, endpoints};
use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::common::{
    ADDRESS_PATTERN, AMOUNT_DECIMALS, MAX_LIST_ENTRIES, NOT_AVAILABLE, format_opt, format_percent,
    lenient, parse_response, showing_line, text_or, token_label, tool_model, validate_addresses,
};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the token overlap tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TokenOverlapParams {
    /// First token contract address.
    #[schemars(description = "First token contract address (0x followed by 40 hex characters)")]
    #[schemars(extend("pattern" = ADDRESS_PATTERN))]
    pub token1: String,

    /// Second token contract address.
    #[schemars(description = "Second token contract address (0x followed by 40 hex characters)")]
    #[schemars(extend("pattern" = ADDRESS_PATTERN))]
    pub token2: String,
}

impl TokenOverlapParams {
    /// Validate raw tool arguments, reporting both fields on failure.
    pub fn from_arguments(args: &Map<String, Value>) -> Result<Self, ToolError> {
        match validate_addresses(args, &["token1", "token2"])?.as_slice() {
            [token1, token2] => Ok(Self {
                token1: token1.to_string(),
                token2: token2.to_string(),
            }),
            _ => Err(ToolError::internal("expected two validated addresses")),
        }
    }
}

// ============================================================================
// Response Model
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OverlapResponse {
    #[serde(default, deserialize_with = "lenient::object")]
    token1: Option<TokenSummary>,
    #[serde(default, deserialize_with = "lenient::object")]
    token2: Option<TokenSummary>,
    #[serde(default, deserialize_with = "lenient::number")]
    overlap_count: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    overlap_percentage: Option<f64>,
    /// Required.
    #[serde(default, deserialize_with = "lenient::entries")]
    overlapping_holders: Option<Vec<OverlapEntry>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenSummary {
    #[serde(default, deserialize_with = "lenient::text")]
    address: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    symbol: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    holder_count: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OverlapEntry {
    #[serde(default, deserialize_with = "lenient::text")]
    address: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    token1_balance: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    token2_balance: Option<f64>,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Token overlap tool - holders common to two tokens.
pub struct TokenOverlapTool;

impl TokenOverlapTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_token_overlap";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Find wallets that hold both of two tokens. Returns holder counts for each token, the size of the overlap, and up to 10 overlapping holders with their balances of each token.";

    /// Validate, fetch and format.
    #[instrument(skip_all, fields(tool = Self::NAME))]
    pub async fn execute(
        api: &dyn AnalyticsApi,
        args: &Map<String, Value>,
    ) -> Result<String, ToolError> {
        let params = TokenOverlapParams::from_arguments(args)?;
        info!("Fetching holder overlap for {} and {}", params.token1, params.token2);

        let endpoint = endpoints::two_token_overlap(&params.token1, &params.token2)?;
        let payload = api.get(&endpoint).await?;
        format_token_overlap(payload)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_model::<TokenOverlapParams>(Self::NAME, Self::DESCRIPTION)
    }
}

/// Render a two-token-overlap payload.
pub fn format_token_overlap(payload: Value) -> Result<String, ToolError> {
    let response: OverlapResponse = parse_response(payload)?;
    let overlaps = response.overlapping_holders.ok_or(ToolError::InvalidResponse)?;
    let token1 = response.token1.unwrap_or_default();
    let token2 = response.token2.unwrap_or_default();

    let mut out = String::from("Token Holder Overlap\n");
    for (index, token) in [(1, &token1), (2, &token2)] {
        out.push_str(&format!(
            "Token {}: {}\n   Address: {}\n   Holders: {}\n",
            index,
            token_label(&token.name, &token.symbol),
            text_or(&token.address, NOT_AVAILABLE),
            format_opt(token.holder_count, 0),
        ));
    }
    out.push_str(&format!(
        "Overlapping Holders: {}\nOverlap: {}\n",
        format_opt(response.overlap_count, 0),
        format_percent(response.overlap_percentage),
    ));

    if overlaps.is_empty() {
        out.push_str("\nNo overlapping holders found.");
        return Ok(out);
    }

    let label1 = token1.symbol.as_deref().unwrap_or("Token 1");
    let label2 = token2.symbol.as_deref().unwrap_or("Token 2");

    let shown = overlaps.len().min(MAX_LIST_ENTRIES);
    out.push('\n');
    out.push_str(&showing_line(shown, overlaps.len(), "overlapping holders"));
    out.push('\n');

    for (rank, entry) in overlaps.iter().take(MAX_LIST_ENTRIES).enumerate() {
        out.push_str(&format!(
            "\n{}. {}\n   {} Balance: {}\n   {} Balance: {}\n",
            rank + 1,
            text_or(&entry.address, NOT_AVAILABLE),
            label1,
            format_opt(entry.token1_balance, AMOUNT_DECIMALS),
            label2,
            format_opt(entry.token2_balance, AMOUNT_DECIMALS),
        ));
    }

    Ok(out.trim_end().to_string())
}
