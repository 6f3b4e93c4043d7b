/// `0x` prefix followed by 40 hexadecimal characters.
const ADDRESS_PREFIX: &str = "0x";
const ADDRESS_HEX_LENGTH: usize = 40;

/// Errors that can occur during address validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("missing required field")]
    Missing,

    #[error("expected a string")]
    NotAString,

    #[error("invalid address '{value}' (expected 0x followed by 40 hexadecimal characters)")]
    InvalidFormat { value: String },
}

/// Check if a string is an EVM-style address.
///
/// Matches `^0x[0-9a-fA-F]{40}$`. The prefix is case-sensitive.
pub fn is_address(value: &str) -> bool {
    value
        .strip_prefix(ADDRESS_PREFIX)
        .is_some_and(|hex| hex.len() == ADDRESS_HEX_LENGTH && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Validates an optional JSON argument as an address.
///
/// # Returns
///
/// * `Ok(&str)` - The address, unchanged
/// * `Err(AddressError)` - If the value is absent, not a string, or malformed
///
/// # Examples
///
/// ```rust,ignore
/// let address = validate_address(args.get("token_address"))?;
/// ```
pub fn validate_address(value: Option<&serde_json::Value>) -> Result<&str, AddressError> {
    let value = match value {
        None | Some(serde_json::Value::Null) => return Err(AddressError::Missing),
        Some(v) => v.as_str().ok_or(AddressError::NotAString)?,
    };

    if !is_address(value) {
        return Err(AddressError::InvalidFormat {
            value: value.to_string(),
        });
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const VALID: &str = "0x1f9840a85d5aF5bf1D1762F925BDADdC4201F984";

    #[test]
    fn test_is_address_valid() {
        assert!(is_address(VALID));
        assert!(is_address("0x0000000000000000000000000000000000000000"));
        assert!(is_address("0xABCDEFabcdef0123456789ABCDEFabcdef012345"));
    }

    #[test]
    fn test_is_address_invalid() {
        assert!(!is_address(""));
        assert!(!is_address("0x"));
        assert!(!is_address("1f9840a85d5aF5bf1D1762F925BDADdC4201F984")); // no prefix
        assert!(!is_address("0X1f9840a85d5aF5bf1D1762F925BDADdC4201F984")); // uppercase prefix
        assert!(!is_address("0x1f9840a85d5aF5bf1D1762F925BDADdC4201F98")); // too short
        assert!(!is_address("0x1f9840a85d5aF5bf1D1762F925BDADdC4201F9845")); // too long
        assert!(!is_address("0x1f9840a85d5aF5bf1D1762F925BDADdC4201F98g")); // non-hex
        assert!(!is_address(" 0x1f9840a85d5aF5bf1D1762F925BDADdC4201F984"));
        assert!(!is_address("0x1f9840a85d5aF5bf1D1762F925BDADdC4201F98é"));
    }

    #[test]
    fn test_validate_address() {
        let value = json!(VALID);
        assert_eq!(validate_address(Some(&value)), Ok(VALID));

        assert_eq!(validate_address(None), Err(AddressError::Missing));
        assert_eq!(validate_address(Some(&json!(null))), Err(AddressError::Missing));
        assert_eq!(validate_address(Some(&json!(42))), Err(AddressError::NotAString));

        let err = validate_address(Some(&json!("0x123"))).unwrap_err();
        assert!(err.to_string().contains("0x123"));
        assert!(err.to_string().contains("40 hexadecimal"));
    }
}
