//! Hex string normalization and address parsing

use alloy_primitives::{Address, B256, U256};

use crate::error::{Error, Result};

/// Strip every leading `0x` / `0X` from a hex string.
///
/// Stripping repeatedly keeps the operation idempotent.
pub fn strip_hex_prefix(value: &str) -> &str {
    let mut rest = value;
    while let Some(stripped) = rest
        .strip_prefix("0x")
        .or_else(|| rest.strip_prefix("0X"))
    {
        rest = stripped;
    }
    rest
}

/// Parse a 20-byte address, with or without prefix, in any letter case
pub fn parse_address(value: &str) -> Result<Address> {
    let payload = strip_hex_prefix(value.trim());
    if payload.len() != 40 || !payload.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::InvalidAddress(format!(
            "`{}` (expected 40 hex chars)",
            value.trim()
        )));
    }
    let bytes = hex::decode(payload).map_err(|e| Error::InvalidAddress(e.to_string()))?;
    Ok(Address::from_slice(&bytes))
}

/// Parse a storage slot given as `0x`-prefixed hex or decimal
pub fn parse_slot(value: &str) -> Result<U256> {
    let value = value.trim();
    let parsed = if value.starts_with("0x") || value.starts_with("0X") {
        let payload = strip_hex_prefix(value);
        if payload.is_empty() {
            Ok(U256::ZERO)
        } else {
            U256::from_str_radix(payload, 16)
        }
    } else {
        U256::from_str_radix(value, 10)
    };
    parsed.map_err(|e| Error::Encoding(format!("invalid storage slot `{}`: {}", value, e)))
}

/// Parse a 32-byte transaction hash
pub fn parse_tx_hash(value: &str) -> Result<B256> {
    let payload = strip_hex_prefix(value.trim());
    let bytes = hex::decode(payload)
        .map_err(|e| Error::Encoding(format!("invalid transaction hash: {}", e)))?;
    if bytes.len() != 32 {
        return Err(Error::Encoding(format!(
            "invalid transaction hash: expected 32 bytes, got {}",
            bytes.len()
        )));
    }
    Ok(B256::from_slice(&bytes))
}
