//! Wallet portfolio tool definition.
//!
//! Lists the token balances held by a wallet, largest USD value first.

use rmcp::model::Tool;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{info, instrument};

use crate::core::api::{AnalyticsApi, endpoints};
use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::common::{
    ADDRESS_PATTERN, AMOUNT_DECIMALS, MAX_LIST_ENTRIES, NOT_AVAILABLE, PRICE_DECIMALS, format_opt,
    format_usd, lenient, parse_response, showing_line, text_or, token_label, tool_model,
    validate_address_field,
};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the wallet portfolio tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PortfolioParams {
    /// Wallet address.
    #[schemars(description = "Wallet address (0x followed by 40 hex characters)")]
    #[schemars(extend("pattern" = ADDRESS_PATTERN))]
    pub wallet_address: String,
}

impl PortfolioParams {
    /// Validate raw tool arguments.
    pub fn from_arguments(args: &Map<String, Value>) -> Result<Self, ToolError> {
        Ok(Self {
            wallet_address: validate_address_field(args, "wallet_address")?,
        })
    }
}

// ============================================================================
// Response Model
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PortfolioResponse {
    #[serde(default, deserialize_with = "lenient::text")]
    wallet_address: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    total_value_usd: Option<f64>,
    /// Required.
    #[serde(default, deserialize_with = "lenient::entries")]
    token_balances: Option<Vec<TokenBalance>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenBalance {
    #[serde(default, deserialize_with = "lenient::text")]
    token_address: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    symbol: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    balance: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    price_usd: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    value_usd: Option<f64>,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Wallet portfolio tool - token balances of a wallet.
pub struct PortfolioTool;

impl PortfolioTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_wallet_portfolio";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get the token portfolio of a wallet: total USD value and the 10 largest token positions by USD value, with balances and prices.";

    /// Validate, fetch and format.
    #[instrument(skip_all, fields(tool = Self::NAME))]
    pub async fn execute(
        api: &dyn AnalyticsApi,
        args: &Map<String, Value>,
    ) -> Result<String, ToolError> {
        let params = PortfolioParams::from_arguments(args)?;
        info!("Fetching portfolio for {}", params.wallet_address);

        let payload = api.get(&endpoints::portfolio(&params.wallet_address)).await?;
        format_portfolio(payload)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_model::<PortfolioParams>(Self::NAME, Self::DESCRIPTION)
    }
}

/// Render a portfolio payload.
///
/// Balances are sorted by descending USD value (absent values count as zero,
/// ties keep upstream order) before truncation.
pub fn format_portfolio(payload: Value) -> Result<String, ToolError> {
    let response: PortfolioResponse = parse_response(payload)?;
    let mut balances = response.token_balances.ok_or(ToolError::InvalidResponse)?;

    balances.sort_by(|a, b| {
        b.value_usd
            .unwrap_or(0.0)
            .total_cmp(&a.value_usd.unwrap_or(0.0))
    });

    let mut out = format!(
        "Wallet Portfolio: {}\nTotal Value: {}\nTokens Held: {}\n",
        text_or(&response.wallet_address, NOT_AVAILABLE),
        format_usd(response.total_value_usd, AMOUNT_DECIMALS),
        balances.len(),
    );

    if balances.is_empty() {
        out.push_str("\nNo token balances found.");
        return Ok(out);
    }

    let shown = balances.len().min(MAX_LIST_ENTRIES);
    out.push_str(&showing_line(shown, balances.len(), "tokens by USD value"));
    out.push('\n');

    for (rank, token) in balances.iter().take(MAX_LIST_ENTRIES).enumerate() {
        out.push_str(&format!(
            "\n{}. {}\n   Address: {}\n   Balance: {}\n   Price: {}\n   Value: {}\n",
            rank + 1,
            token_label(&token.name, &token.symbol),
            text_or(&token.token_address, NOT_AVAILABLE),
            format_opt(token.balance, AMOUNT_DECIMALS),
            format_usd(token.price_usd, PRICE_DECIMALS),
            format_usd(token.value_usd, AMOUNT_DECIMALS),
        ));
    }

    Ok(out.trim_end().to_string())
}
