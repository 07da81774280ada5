use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid address for {name}: {value}. Expected 0x followed by 40 hex digits")]
    InvalidAddress { name: String, value: String },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

pub fn validate_api_key(api_key: &str) -> Result<(), ValidationError> {
    if api_key.trim().is_empty() {
        return Err(ValidationError::MissingParameter("EXPLORER_API_KEY".to_string()));
    }

    Ok(())
}

/// Accepts any `0x`-prefixed 20-byte hex address. Case is not checked, addresses
/// are used exactly as configured.
pub fn validate_evm_address(name: &str, address: &str) -> Result<(), ValidationError> {
    if address.trim().is_empty() {
        return Err(ValidationError::MissingParameter(name.to_string()));
    }

    let invalid = || ValidationError::InvalidAddress {
        name: name.to_string(),
        value: address.to_string(),
    };

    let hex = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .ok_or_else(invalid)?;

    if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    Ok(())
}
