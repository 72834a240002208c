use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid Ethereum address format: {0}")]
    InvalidEthereumAddress(String),
}

pub fn validate_eth_address(address: &str) -> Result<(), ValidationError> {
    if address.trim().is_empty() {
        return Err(ValidationError::MissingParameter(
            "contract_address".to_string(),
        ));
    }

    // 0x followed by 40 hex digits
    let hex = match address.strip_prefix("0x") {
        Some(hex) => hex,
        None => return Err(ValidationError::InvalidEthereumAddress(address.to_string())),
    };

    if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ValidationError::InvalidEthereumAddress(address.to_string()));
    }

    Ok(())
}
