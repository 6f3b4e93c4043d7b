//! Common utilities shared across analytics tools.
//!
//! This module provides argument validation, lenient decoding of upstream
//! payloads and the number formatting used by every formatter.

use rmcp::{handler::server::tool::cached_schema_for_type, model::Tool};
use schemars::JsonSchema;
use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::core::security::validate_address;
use crate::domains::tools::ToolError;

/// Lists in tool output are truncated to this many entries.
pub const MAX_LIST_ENTRIES: usize = 10;

/// Placeholder for absent numbers and addresses.
pub const NOT_AVAILABLE: &str = "N/A";

/// Placeholder for absent names and symbols.
pub const UNKNOWN: &str = "Unknown";

/// Placeholder for absent optional sections.
pub const NOT_PROVIDED: &str = "Not available";

/// JSON-Schema pattern advertised for address parameters.
pub const ADDRESS_PATTERN: &str = "^0x[0-9a-fA-F]{40}$";

pub const PRICE_DECIMALS: usize = 6;
pub const PERCENT_DECIMALS: usize = 2;
pub const AMOUNT_DECIMALS: usize = 2;

// ============================================================================
// Arguments
// ============================================================================

/// Validate every address field, collecting all violations.
///
/// Returns the addresses in the order of `fields`. On failure the error
/// names each offending field, not just the first one.
pub fn validate_addresses<'a>(
    args: &'a Map<String, Value>,
    fields: &[&str],
) -> Result<Vec<&'a str>, ToolError> {
    let mut addresses = Vec::with_capacity(fields.len());
    let mut violations = Vec::new();

    for field in fields {
        match validate_address(args.get(*field)) {
            Ok(address) => addresses.push(address),
            Err(e) => violations.push(format!("{field}: {e}")),
        }
    }

    if violations.is_empty() {
        Ok(addresses)
    } else {
        warn!("Argument validation failed: {}", violations.join("; "));
        Err(ToolError::invalid_arguments(violations))
    }
}

/// Validate a single address field.
pub fn validate_address_field(args: &Map<String, Value>, field: &str) -> Result<String, ToolError> {
    validate_addresses(args, &[field])?
        .first()
        .map(|address| address.to_string())
        .ok_or_else(|| ToolError::internal(format!("no value validated for {field}")))
}

/// Build a Tool model from its name, description and parameter struct.
pub fn tool_model<P: JsonSchema + 'static>(name: &'static str, description: &'static str) -> Tool {
    Tool {
        name: name.into(),
        description: Some(description.into()),
        input_schema: cached_schema_for_type::<P>(),
        annotations: None,
        output_schema: None,
        icons: None,
        meta: None,
        title: None,
    }
}

// ============================================================================
// Payload decoding
// ============================================================================

/// Decode an upstream payload into its response model.
///
/// Any shape mismatch (non-object payload, required container missing or of
/// the wrong type) becomes [`ToolError::InvalidResponse`].
pub fn parse_response<T: DeserializeOwned>(payload: Value) -> Result<T, ToolError> {
    if !payload.is_object() {
        warn!("Expected a JSON object from the API, got: {}", json_kind(&payload));
        return Err(ToolError::InvalidResponse);
    }

    serde_json::from_value(payload).map_err(|e| {
        warn!("Unexpected response shape: {}", e);
        ToolError::InvalidResponse
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Deserializers that never fail on a type mismatch.
///
/// Upstream numbers may arrive as JSON numbers or numeric strings, and text
/// may arrive as numbers. Anything unusable decodes to `None`.
pub mod lenient {
    use super::*;
    use serde::de::Error as _;

    pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .filter(|n| n.is_finite()))
    }

    pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    }

    /// An optional nested object. Any other shape decodes to `None`.
    pub fn object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(value @ Value::Object(_)) => serde_json::from_value(value).ok(),
            _ => None,
        })
    }

    /// An optional list. A non-list decodes to `None` and entries that are
    /// not objects are dropped.
    pub fn list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Array(items)) => Some(object_entries(items)),
            _ => None,
        })
    }

    /// The required list of an endpoint.
    ///
    /// Absent or `null` decodes to `None` and any other non-list shape is a
    /// decoding error. Entries that are not objects are dropped.
    pub fn entries<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Array(items)) => Ok(Some(object_entries(items))),
            Some(other) => Err(D::Error::custom(format!(
                "expected a list, got {}",
                json_kind(&other)
            ))),
        }
    }

    fn object_entries<T: DeserializeOwned>(items: Vec<Value>) -> Vec<T> {
        let total = items.len();
        let entries: Vec<T> = items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect();
        if entries.len() < total {
            debug!("Dropped {} malformed list entries", total - entries.len());
        }
        entries
    }
}

// ============================================================================
// Formatting
// ============================================================================

/// Format a number with thousands separators and fixed decimals.
///
/// `format_number(1234567.891, 2)` gives `"1,234,567.89"`.
pub fn format_number(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }

    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);

    // Avoid "-0.00" when the value rounds to zero
    if value.is_sign_negative() && fixed.bytes().any(|b| (b'1'..=b'9').contains(&b)) {
        out.push('-');
    }

    let len = int_part.len();
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }

    if let Some(frac_part) = frac_part {
        out.push('.');
        out.push_str(frac_part);
    }

    out
}

/// Format an optional number, or [`NOT_AVAILABLE`].
pub fn format_opt(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|v| format_number(v, decimals))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Format an optional USD amount as `$1,234.56`, or [`NOT_AVAILABLE`].
pub fn format_usd(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) if v < 0.0 => format!("-${}", format_number(-v, decimals)),
        Some(v) => format!("${}", format_number(v, decimals)),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Format an optional percentage as `12.34%`, or [`NOT_AVAILABLE`].
pub fn format_percent(value: Option<f64>) -> String {
    value
        .map(|v| format!("{}%", format_number(v, PERCENT_DECIMALS)))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Text or a placeholder.
pub fn text_or<'a>(value: &'a Option<String>, placeholder: &'a str) -> &'a str {
    value.as_deref().unwrap_or(placeholder)
}

/// Display label for a token from its optional name and symbol.
pub fn token_label(name: &Option<String>, symbol: &Option<String>) -> String {
    match (name, symbol) {
        (Some(name), Some(symbol)) => format!("{name} ({symbol})"),
        (Some(label), None) | (None, Some(label)) => label.clone(),
        (None, None) => UNKNOWN.to_string(),
    }
}

/// `"Showing 10 of 15"` style header for truncated lists.
pub fn showing_line(shown: usize, total: usize, noun: &str) -> String {
    if shown == total {
        format!("Showing all {total} {noun}")
    } else {
        format!("Showing {shown} of {total} {noun}")
    }
}

/// Percent change of a balance over a period.
///
/// `change / start * 100` when both are present and non-zero, else `"0.00"`.
pub fn percent_change(change: Option<f64>, start: Option<f64>) -> String {
    match (change, start) {
        (Some(change), Some(start)) if change != 0.0 && start != 0.0 => {
            format_number(change / start * 100.0, PERCENT_DECIMALS)
        }
        _ => format_number(0.0, PERCENT_DECIMALS),
    }
}

/// Profit/loss percent of a position relative to its entry price.
///
/// `None` when either price is missing or the entry price is zero.
pub fn profit_loss_percent(current_price: Option<f64>, entry_price: Option<f64>) -> Option<f64> {
    match (current_price, entry_price) {
        (Some(current), Some(entry)) if entry != 0.0 => Some((current - entry) / entry * 100.0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const VALID: &str = "0x1f9840a85d5aF5bf1D1762F925BDADdC4201F984";

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(0.5, 6), "0.500000");
        assert_eq!(format_number(999.0, 0), "999");
        assert_eq!(format_number(1000.0, 0), "1,000");
        assert_eq!(format_number(100000.0, 2), "100,000.00");
        assert_eq!(format_number(-1234.5, 2), "-1,234.50");
        assert_eq!(format_number(-0.001, 2), "0.00");
        assert_eq!(format_number(0.0000123, 6), "0.000012");
        assert_eq!(format_number(f64::NAN, 2), "N/A");
    }

    #[test]
    fn test_format_helpers() {
        assert_eq!(format_usd(Some(1500.0), 2), "$1,500.00");
        assert_eq!(format_usd(Some(-2.5), 2), "-$2.50");
        assert_eq!(format_usd(None, 2), "N/A");
        assert_eq!(format_percent(Some(12.346)), "12.35%");
        assert_eq!(format_percent(None), "N/A");
        assert_eq!(format_opt(None, 2), "N/A");
        assert_eq!(text_or(&None, UNKNOWN), "Unknown");
        assert_eq!(text_or(&Some("UNI".into()), UNKNOWN), "UNI");
        assert_eq!(token_label(&Some("Uniswap".into()), &Some("UNI".into())), "Uniswap (UNI)");
        assert_eq!(token_label(&None, &Some("UNI".into())), "UNI");
        assert_eq!(token_label(&None, &None), "Unknown");
        assert_eq!(showing_line(10, 15, "holders"), "Showing 10 of 15 holders");
        assert_eq!(showing_line(3, 3, "holders"), "Showing all 3 holders");
    }

    #[test]
    fn test_percent_change() {
        assert_eq!(percent_change(Some(50.0), Some(200.0)), "25.00");
        assert_eq!(percent_change(Some(0.0), Some(200.0)), "0.00");
        assert_eq!(percent_change(Some(50.0), Some(0.0)), "0.00");
        assert_eq!(percent_change(None, Some(200.0)), "0.00");
        assert_eq!(percent_change(Some(50.0), None), "0.00");
        assert_eq!(percent_change(Some(-100.0), Some(400.0)), "-25.00");
    }

    #[test]
    fn test_profit_loss_percent() {
        assert_eq!(profit_loss_percent(Some(1.5), Some(1.0)), Some(50.0));
        assert_eq!(profit_loss_percent(Some(0.5), Some(1.0)), Some(-50.0));
        assert_eq!(profit_loss_percent(Some(1.0), Some(0.0)), None);
        assert_eq!(profit_loss_percent(None, Some(1.0)), None);
        assert_eq!(profit_loss_percent(Some(1.0), None), None);
    }

    #[test]
    fn test_validate_addresses_collects_every_violation() {
        let args = json!({ "token1": "0x123", "token2": 7 });
        let args = args.as_object().unwrap();

        let err = validate_addresses(args, &["token1", "token2", "token3"]).unwrap_err();
        match err {
            ToolError::InvalidArguments(violations) => {
                assert_eq!(violations.len(), 3);
                assert!(violations[0].starts_with("token1:"));
                assert!(violations[1].starts_with("token2:"));
                assert!(violations[2].starts_with("token3: missing"));
            }
            other => panic!("Expected InvalidArguments, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_addresses_ok() {
        let args = json!({ "a": VALID, "b": VALID });
        let addresses = validate_addresses(args.as_object().unwrap(), &["a", "b"]).unwrap();
        assert_eq!(addresses, vec![VALID, VALID]);
    }

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "lenient::number")]
        amount: Option<f64>,
        #[serde(default, deserialize_with = "lenient::text")]
        label: Option<String>,
    }

    #[test]
    fn test_lenient_fields() {
        let sample: Sample = parse_response(json!({ "amount": "12.5", "label": 3 })).unwrap();
        assert_eq!(sample.amount, Some(12.5));
        assert_eq!(sample.label.as_deref(), Some("3"));

        let sample: Sample = parse_response(json!({ "amount": {"x": 1}, "label": "" })).unwrap();
        assert_eq!(sample.amount, None);
        assert_eq!(sample.label, None);

        let sample: Sample = parse_response(json!({})).unwrap();
        assert_eq!(sample.amount, None);
    }

    #[derive(Debug, Deserialize)]
    struct Entry {
        #[serde(default, deserialize_with = "lenient::text")]
        address: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    struct Nested {
        #[serde(default, deserialize_with = "lenient::object")]
        owner: Option<Entry>,
        #[serde(default, deserialize_with = "lenient::list")]
        extras: Option<Vec<Entry>>,
        #[serde(default, deserialize_with = "lenient::entries")]
        items: Option<Vec<Entry>>,
    }

    #[test]
    fn test_lenient_object_and_list_shapes() {
        let nested: Nested = parse_response(json!({
            "owner": "0xabc",
            "extras": "unavailable",
            "items": [{ "address": VALID }, 7, null, "x", {}]
        }))
        .unwrap();

        assert!(nested.owner.is_none());
        assert!(nested.extras.is_none());
        let items = nested.items.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].address.as_deref(), Some(VALID));
        assert!(items[1].address.is_none());

        let nested: Nested = parse_response(json!({
            "owner": { "address": VALID },
            "extras": [1, { "address": VALID }]
        }))
        .unwrap();
        assert_eq!(nested.owner.unwrap().address.as_deref(), Some(VALID));
        assert_eq!(nested.extras.unwrap().len(), 1);
        assert!(nested.items.is_none());
    }

    #[test]
    fn test_required_entries_reject_non_lists() {
        assert!(matches!(
            parse_response::<Nested>(json!({ "items": "none" })),
            Err(ToolError::InvalidResponse)
        ));
        assert!(matches!(
            parse_response::<Nested>(json!({ "items": { "address": VALID } })),
            Err(ToolError::InvalidResponse)
        ));
        let nested: Nested = parse_response(json!({ "items": null })).unwrap();
        assert!(nested.items.is_none());
    }

    #[test]
    fn test_parse_response_rejects_non_objects() {
        assert!(matches!(
            parse_response::<Sample>(json!([])),
            Err(ToolError::InvalidResponse)
        ));
        assert!(matches!(
            parse_response::<Sample>(json!(null)),
            Err(ToolError::InvalidResponse)
        ));
    }
}
