//! Endpoint paths of the analytics API.
//!
//! Callers must pass addresses that already passed
//! [`validate_address`](crate::core::security::validate_address); path
//! segments are interpolated as-is.

use super::ApiResult;

const TOKEN_PREFIX: &str = "/api/token";

pub fn token_info(address: &str) -> String {
    format!("{TOKEN_PREFIX}/token-info/{address}")
}

pub fn top_holders(address: &str) -> String {
    format!("{TOKEN_PREFIX}/top-holders/{address}")
}

pub fn holder_balance_changes(address: &str) -> String {
    format!("{TOKEN_PREFIX}/token-holder-balance-changes/{address}")
}

pub fn portfolio(address: &str) -> String {
    format!("{TOKEN_PREFIX}/portfolio/{address}")
}

pub fn avg_entry(address: &str) -> String {
    format!("{TOKEN_PREFIX}/avg-entry/{address}")
}

/// Two-token overlap takes both addresses in the query string.
pub fn two_token_overlap(token1: &str, token2: &str) -> ApiResult<String> {
    let query = serde_urlencoded::to_string([("token1", token1), ("token2", token2)])?;
    Ok(format!("{TOKEN_PREFIX}/two-token-overlap?{query}"))
}
