//! Conversions between Alloy transport types and crate types

use std::num::ParseIntError;

use alloy::transports::TransportError;

use crate::address::strip_hex_prefix;
use crate::error::RpcError;

/// Convert an Alloy transport error into a classified [`RpcError`]
pub fn convert_transport_error(err: TransportError) -> RpcError {
    match err.as_error_resp() {
        Some(payload) => {
            // `data` arrives as raw JSON; revert payloads are JSON strings
            let data = payload.data.as_ref().map(|raw| {
                serde_json::from_str::<String>(raw.get()).unwrap_or_else(|_| raw.get().to_string())
            });
            RpcError::from_response(payload.code, payload.message.to_string(), data)
        }
        None => RpcError::transport(err.to_string()),
    }
}

/// Parse a hex quantity such as `"0x1b4"`
pub fn parse_hex_u64(s: &str) -> Result<u64, ParseIntError> {
    let s = strip_hex_prefix(s);
    if s.is_empty() {
        return Ok(0);
    }
    u64::from_str_radix(s, 16)
}
