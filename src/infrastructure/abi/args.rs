//! Command-line argument parsing against a method's input types

use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::{FixedBytes, I256, U256};

use super::codec::{check_range, resolve_types};
use crate::address::{parse_address, strip_hex_prefix};
use crate::domain::abi::MethodSpec;
use crate::error::{Error, Result};

/// Parse textual arguments for `method`, one per input parameter
pub fn parse_args(method: &MethodSpec, args: &[String]) -> Result<Vec<DynSolValue>> {
    let types = resolve_types(&method.inputs).map_err(Error::Encoding)?;

    if args.len() != types.len() {
        return Err(Error::Encoding(format!(
            "{} expects {} argument(s), got {}",
            method.signature,
            types.len(),
            args.len()
        )));
    }

    types
        .iter()
        .zip(args)
        .enumerate()
        .map(|(idx, (ty, arg))| {
            parse_value(ty, arg).map_err(|e| {
                let msg = format!("failed to parse argument {} (type {}): {}", idx + 1, ty, e);
                Error::Encoding(msg)
            })
        })
        .collect()
}

/// Parse a single value according to its type
pub fn parse_value(ty: &DynSolType, arg: &str) -> std::result::Result<DynSolValue, String> {
    let arg = arg.trim();
    match ty {
        DynSolType::Address => parse_address(arg)
            .map(DynSolValue::Address)
            .map_err(|e| e.to_string()),

        DynSolType::Bool => match arg.to_lowercase().as_str() {
            "true" | "1" => Ok(DynSolValue::Bool(true)),
            "false" | "0" => Ok(DynSolValue::Bool(false)),
            _ => Err(format!("invalid bool: expected true/false, got '{}'", arg)),
        },

        DynSolType::Int(size) => {
            let value = if is_hex(arg) {
                let bytes = parse_hex_to_bytes(strip_hex_prefix(arg), 32)?;
                let mut array = [0u8; 32];
                array.copy_from_slice(&bytes);
                I256::from_be_bytes(array)
            } else {
                arg.parse::<I256>()
                    .map_err(|e| format!("invalid integer: {}", e))?
            };
            let value = DynSolValue::Int(value, *size);
            check_range(&value)?;
            Ok(value)
        }

        DynSolType::Uint(size) => {
            let value = if is_hex(arg) {
                let payload = strip_hex_prefix(arg);
                if payload.is_empty() {
                    U256::ZERO
                } else {
                    U256::from_str_radix(payload, 16)
                        .map_err(|e| format!("invalid unsigned integer: {}", e))?
                }
            } else {
                U256::from_str_radix(arg, 10)
                    .map_err(|e| format!("invalid unsigned integer: {}", e))?
            };
            let value = DynSolValue::Uint(value, *size);
            check_range(&value)?;
            Ok(value)
        }

        DynSolType::Bytes => {
            let bytes =
                hex::decode(strip_hex_prefix(arg)).map_err(|e| format!("invalid hex: {}", e))?;
            Ok(DynSolValue::Bytes(bytes))
        }

        DynSolType::FixedBytes(size) => {
            let bytes =
                hex::decode(strip_hex_prefix(arg)).map_err(|e| format!("invalid hex: {}", e))?;
            if bytes.len() != *size {
                return Err(format!(
                    "invalid bytes length: expected {} bytes, got {}",
                    size,
                    bytes.len()
                ));
            }
            Ok(DynSolValue::FixedBytes(
                FixedBytes::<32>::right_padding_from(&bytes),
                *size,
            ))
        }

        DynSolType::String => {
            let s = if arg.len() >= 2
                && ((arg.starts_with('"') && arg.ends_with('"'))
                    || (arg.starts_with('\'') && arg.ends_with('\'')))
            {
                &arg[1..arg.len() - 1]
            } else {
                arg
            };
            Ok(DynSolValue::String(s.to_string()))
        }

        DynSolType::Array(inner) => {
            let elements = enclosed(arg, '[', ']')?;
            let values = elements
                .into_iter()
                .map(|elem| parse_value(inner, elem))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(DynSolValue::Array(values))
        }

        DynSolType::FixedArray(inner, size) => {
            let elements = enclosed(arg, '[', ']')?;
            if elements.len() != *size {
                return Err(format!(
                    "fixed array size mismatch: expected {} elements, got {}",
                    size,
                    elements.len()
                ));
            }
            let values = elements
                .into_iter()
                .map(|elem| parse_value(inner, elem))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(DynSolValue::FixedArray(values))
        }

        DynSolType::Tuple(types) => {
            let elements = enclosed(arg, '(', ')')?;
            if elements.len() != types.len() {
                return Err(format!(
                    "tuple size mismatch: expected {} elements, got {}",
                    types.len(),
                    elements.len()
                ));
            }
            let values = types
                .iter()
                .zip(elements)
                .map(|(ty, elem)| parse_value(ty, elem))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(DynSolValue::Tuple(values))
        }

        _ => Err(format!("unsupported type: {}", ty)),
    }
}

fn is_hex(arg: &str) -> bool {
    arg.starts_with("0x") || arg.starts_with("0X")
}

/// Parse hex string to bytes with left zero padding
fn parse_hex_to_bytes(hex_str: &str, expected_size: usize) -> std::result::Result<Vec<u8>, String> {
    let hex_str = if hex_str.len() % 2 == 1 {
        format!("0{}", hex_str)
    } else {
        hex_str.to_string()
    };
    let bytes = hex::decode(&hex_str).map_err(|e| format!("invalid hex: {}", e))?;

    if bytes.len() > expected_size {
        return Err(format!(
            "hex value too large: expected max {} bytes, got {}",
            expected_size,
            bytes.len()
        ));
    }

    let mut padded = vec![0u8; expected_size];
    padded[expected_size - bytes.len()..].copy_from_slice(&bytes);
    Ok(padded)
}

/// Strip the delimiters of `[a,b]` / `(a,b)` and split on top-level commas
fn enclosed(arg: &str, open: char, close: char) -> std::result::Result<Vec<&str>, String> {
    if !arg.starts_with(open) || !arg.ends_with(close) || arg.len() < 2 {
        return Err(format!(
            "expected a value enclosed in {}{}: {}",
            open, close, arg
        ));
    }
    let inner = arg[1..arg.len() - 1].trim();
    if inner.is_empty() {
        return Ok(Vec::new());
    }
    Ok(split_top_level(inner))
}

/// Split on commas that are not nested inside brackets, parentheses or quotes
fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    // the quote character of the string literal currently open, if any
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (idx, c) in s.char_indices() {
        match (quote, c) {
            (Some(open), _) if c == open => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[' | '(') => depth += 1,
            (None, ']' | ')') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(s[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(s[start..].trim());
    parts
}
