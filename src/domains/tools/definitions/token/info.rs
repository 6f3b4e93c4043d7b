//! Token information tool definition.
//!
//! Fetches metadata for a single token: name, symbol, supply, price and
//! holder count.

use rmcp::model::Tool;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{info, instrument};

use crate::core::api::{AnalyticsApi, endpoints};
use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::common::{
    ADDRESS_PATTERN, AMOUNT_DECIMALS, NOT_AVAILABLE, PRICE_DECIMALS, UNKNOWN, format_opt,
    format_usd, lenient, parse_response, text_or, tool_model, validate_address_field,
};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the token info tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TokenInfoParams {
    /// Token contract address.
    #[schemars(description = "Token contract address (0x followed by 40 hex characters)")]
    #[schemars(extend("pattern" = ADDRESS_PATTERN))]
    pub token_address: String,
}

impl TokenInfoParams {
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
struct TokenInfoResponse {
    #[serde(default, deserialize_with = "lenient::text")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    symbol: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    address: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    chain: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    decimals: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    total_supply: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    price_usd: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    market_cap: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    volume_24h: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    holder_count: Option<f64>,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Token info tool - metadata for one token.
pub struct TokenInfoTool;

impl TokenInfoTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_token_info";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get metadata for a token: name, symbol, decimals, total supply, USD price, market cap, 24h volume and holder count.";

    /// Validate, fetch and format.
    #[instrument(skip_all, fields(tool = Self::NAME))]
    pub async fn execute(
        api: &dyn AnalyticsApi,
        args: &Map<String, Value>,
    ) -> Result<String, ToolError> {
        let params = TokenInfoParams::from_arguments(args)?;
        info!("Fetching token info for {}", params.token_address);

        let payload = api.get(&endpoints::token_info(&params.token_address)).await?;
        format_token_info(payload)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_model::<TokenInfoParams>(Self::NAME, Self::DESCRIPTION)
    }
}

/// Render a token-info payload.
pub fn format_token_info(payload: Value) -> Result<String, ToolError> {
    let token: TokenInfoResponse = parse_response(payload)?;

    let lines = [
        "Token Information".to_string(),
        "=================".to_string(),
        format!("Name: {}", text_or(&token.name, UNKNOWN)),
        format!("Symbol: {}", text_or(&token.symbol, UNKNOWN)),
        format!("Address: {}", text_or(&token.address, NOT_AVAILABLE)),
        format!("Chain: {}", text_or(&token.chain, NOT_AVAILABLE)),
        format!("Decimals: {}", format_opt(token.decimals, 0)),
        format!("Total Supply: {}", format_opt(token.total_supply, AMOUNT_DECIMALS)),
        format!("Price: {}", format_usd(token.price_usd, PRICE_DECIMALS)),
        format!("Market Cap: {}", format_usd(token.market_cap, AMOUNT_DECIMALS)),
        format!("24h Volume: {}", format_usd(token.volume_24h, AMOUNT_DECIMALS)),
        format!("Holders: {}", format_opt(token.holder_count, 0)),
    ];

    Ok(lines.join("\n"))
}
