//! ABI codec implementation using alloy-dyn-abi

use alloy_dyn_abi::{DynSolType, DynSolValue};

use crate::domain::abi::{AbiCodec, DecodedValue, MethodSpec, ParamSpec};
use crate::error::{Error, Result};

/// ABI codec implementation using alloy-dyn-abi
#[derive(Debug, Default, Clone, Copy)]
pub struct AlloyAbiCodec;

impl AlloyAbiCodec {
    pub fn new() -> Self {
        Self
    }
}

impl AbiCodec for AlloyAbiCodec {
    fn encode_call(&self, method: &MethodSpec, args: &[DynSolValue]) -> Result<Vec<u8>> {
        let types = resolve_types(&method.inputs).map_err(Error::Encoding)?;

        if args.len() != types.len() {
            return Err(Error::Encoding(format!(
                "argument count mismatch for {}: expected {}, got {}",
                method.signature,
                types.len(),
                args.len()
            )));
        }

        for (idx, (ty, arg)) in types.iter().zip(args).enumerate() {
            if !ty.matches(arg) {
                let got = arg
                    .as_type()
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                return Err(Error::Encoding(format!(
                    "argument {} of {}: expected {}, got {}",
                    idx + 1,
                    method.signature,
                    ty,
                    got
                )));
            }
            check_range(arg).map_err(|e| {
                Error::Encoding(format!("argument {} of {}: {}", idx + 1, method.signature, e))
            })?;
        }

        let mut calldata = method.selector.to_vec();
        if !args.is_empty() {
            // Wrap values in a tuple for proper encoding
            let encoded = DynSolValue::Tuple(args.to_vec()).abi_encode_params();
            calldata.extend_from_slice(&encoded);
        }

        Ok(calldata)
    }

    fn decode_output(&self, method: &MethodSpec, data: &[u8]) -> Result<Vec<DecodedValue>> {
        let types = resolve_types(&method.outputs).map_err(Error::Decoding)?;
        if types.is_empty() {
            return Ok(Vec::new());
        }

        let decoded = DynSolType::Tuple(types)
            .abi_decode_params(data)
            .map_err(|e| {
                Error::Decoding(format!(
                    "failed to decode output of {} ({} bytes): {}",
                    method.signature,
                    data.len(),
                    e
                ))
            })?;

        // Extract individual values from the tuple
        match decoded {
            DynSolValue::Tuple(values) => Ok(values),
            other => Ok(vec![other]),
        }
    }
}

/// Parse types from parameter specs
pub(crate) fn resolve_types(params: &[ParamSpec]) -> std::result::Result<Vec<DynSolType>, String> {
    params
        .iter()
        .map(|param| {
            param.kind.parse::<DynSolType>().map_err(|e| {
                format!(
                    "failed to parse type '{}' for param '{}': {}",
                    param.kind, param.name, e
                )
            })
        })
        .collect()
}

/// Check that every integer and fixed-bytes value fits its declared width,
/// which `DynSolType::matches` does not look at
pub(crate) fn check_range(value: &DynSolValue) -> std::result::Result<(), String> {
    match value {
        DynSolValue::Uint(v, size) => {
            if *size < 256 && v.bit_len() > *size {
                return Err(format!("value {} does not fit in uint{}", v, size));
            }
            Ok(())
        }
        DynSolValue::Int(v, size) => {
            // -2^(N-1) <= v < 2^(N-1); for negatives, !raw == -v - 1
            let raw = v.into_raw();
            let magnitude = if v.is_negative() { !raw } else { raw };
            if *size == 0 || magnitude.bit_len() > *size - 1 {
                return Err(format!("value {} does not fit in int{}", v, size));
            }
            Ok(())
        }
        DynSolValue::FixedBytes(word, size) => {
            let size = (*size).min(32);
            if word[size..].iter().any(|b| *b != 0) {
                return Err(format!("value 0x{} does not fit in bytes{}", hex::encode(word), size));
            }
            Ok(())
        }
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) | DynSolValue::Tuple(items) => {
            items.iter().try_for_each(check_range)
        }
        _ => Ok(()),
    }
}

/// Format a decoded value for display
pub fn format_value(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::Int(i, _) => i.to_string(),
        DynSolValue::Uint(u, _) => u.to_string(),
        DynSolValue::FixedBytes(word, size) => {
            let bytes = &word.as_slice()[..(*size).min(32)];
            format!("0x{}", hex::encode(bytes))
        }
        DynSolValue::Address(addr) => addr.to_checksum(None),
        DynSolValue::Function(func) => format!("0x{}", hex::encode(func.as_slice())),
        DynSolValue::Bytes(bytes) => format!("0x{}", hex::encode(bytes)),
        DynSolValue::String(s) => format!("{:?}", s),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) => {
            let items: Vec<String> = items.iter().map(format_value).collect();
            format!("[{}]", items.join(", "))
        }
        DynSolValue::Tuple(fields) => {
            let items: Vec<String> = fields.iter().map(format_value).collect();
            format!("({})", items.join(", "))
        }
        #[allow(unreachable_patterns)]
        other => format!("{:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, I256, U256};

    fn param(name: &str, kind: &str) -> ParamSpec {
        ParamSpec {
            name: name.to_string(),
            kind: kind.to_string(),
        }
    }

    fn make_transfer_method() -> MethodSpec {
        MethodSpec {
            selector: [0xa9, 0x05, 0x9c, 0xbb],
            name: "transfer".to_string(),
            signature: "transfer(address,uint256)".to_string(),
            inputs: vec![param("to", "address"), param("amount", "uint256")],
            outputs: vec![param("", "bool")],
        }
    }

    #[test]
    fn test_encode_transfer() {
        let method = make_transfer_method();
        let to: Address = "0x1234567890123456789012345678901234567890".parse().unwrap();
        let args = vec![
            DynSolValue::Address(to),
            DynSolValue::Uint(U256::from(1000), 256),
        ];

        let calldata = AlloyAbiCodec.encode_call(&method, &args).unwrap();

        assert_eq!(
            hex::encode(&calldata),
            "a9059cbb000000000000000000000000123456789012345678901234567890123456789000000000000000000000000000000000000000000000000000000000000003e8"
        );
    }

    #[test]
    fn test_encode_no_args_is_selector_only() {
        let method = MethodSpec {
            selector: [0x18, 0x16, 0x0d, 0xdd],
            name: "totalSupply".to_string(),
            signature: "totalSupply()".to_string(),
            inputs: vec![],
            outputs: vec![param("", "uint256")],
        };

        let calldata = AlloyAbiCodec.encode_call(&method, &[]).unwrap();
        assert_eq!(calldata, vec![0x18, 0x16, 0x0d, 0xdd]);
    }

    #[test]
    fn test_encode_argument_count_mismatch() {
        let method = make_transfer_method();
        let result = AlloyAbiCodec.encode_call(&method, &[DynSolValue::Address(Address::ZERO)]);
        match result {
            Err(Error::Encoding(msg)) => assert!(msg.contains("argument count mismatch")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_encode_type_mismatch() {
        let method = make_transfer_method();
        let args = vec![DynSolValue::Bool(true), DynSolValue::Uint(U256::from(1), 256)];
        assert!(matches!(
            AlloyAbiCodec.encode_call(&method, &args),
            Err(Error::Encoding(_))
        ));
    }

    fn single_input(kind: &str) -> MethodSpec {
        MethodSpec {
            selector: [0x31, 0x20, 0xd4, 0x34],
            name: "set".to_string(),
            signature: format!("set({})", kind),
            inputs: vec![param("value", kind)],
            outputs: vec![],
        }
    }

    #[test]
    fn test_encode_rejects_out_of_range_uint() {
        let method = single_input("uint8");
        let result = AlloyAbiCodec.encode_call(&method, &[DynSolValue::Uint(U256::from(1000), 8)]);
        assert!(matches!(result, Err(Error::Encoding(msg)) if msg.contains("uint8")));

        let ok = AlloyAbiCodec.encode_call(&method, &[DynSolValue::Uint(U256::from(255), 8)]);
        assert!(ok.is_ok());
    }

    #[test]
    fn test_encode_rejects_out_of_range_int() {
        let method = single_input("int8");
        let int8 = |v: i64| DynSolValue::Int(I256::try_from(v).unwrap(), 8);

        assert!(AlloyAbiCodec.encode_call(&method, &[int8(127)]).is_ok());
        assert!(AlloyAbiCodec.encode_call(&method, &[int8(-128)]).is_ok());
        assert!(matches!(
            AlloyAbiCodec.encode_call(&method, &[int8(128)]),
            Err(Error::Encoding(_))
        ));
        assert!(matches!(
            AlloyAbiCodec.encode_call(&method, &[int8(-129)]),
            Err(Error::Encoding(_))
        ));
    }

    #[test]
    fn test_range_check_recurses_and_covers_fixed_bytes() {
        let nested = DynSolValue::Array(vec![DynSolValue::Tuple(vec![
            DynSolValue::Bool(true),
            DynSolValue::Uint(U256::from(256), 8),
        ])]);
        assert!(check_range(&nested).is_err());

        let mut word = [0u8; 32];
        word[..2].copy_from_slice(&[0xde, 0xad]);
        assert!(check_range(&DynSolValue::FixedBytes(word.into(), 2)).is_ok());
        word[2] = 0xbe;
        assert!(check_range(&DynSolValue::FixedBytes(word.into(), 2)).is_err());
    }

    #[test]
    fn test_decode_outputs_in_order() {
        let method = MethodSpec {
            selector: [0; 4],
            name: "info".to_string(),
            signature: "info()".to_string(),
            inputs: vec![],
            outputs: vec![param("owner", "address"), param("name", "string")],
        };
        let owner = Address::repeat_byte(0x42);
        let data = DynSolValue::Tuple(vec![
            DynSolValue::Address(owner),
            DynSolValue::String("wallet".to_string()),
        ])
        .abi_encode_params();

        let values = AlloyAbiCodec.decode_output(&method, &data).unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0], DynSolValue::Address(owner));
        assert_eq!(values[1], DynSolValue::String("wallet".to_string()));
    }

    #[test]
    fn test_decode_empty_output_fails() {
        let method = make_transfer_method();
        assert!(matches!(
            AlloyAbiCodec.decode_output(&method, &[]),
            Err(Error::Decoding(_))
        ));
    }

    #[test]
    fn test_format_value() {
        let owner: Address = "0x4510108d3033173b84919f4941695d4190a0f40f".parse().unwrap();
        assert_eq!(
            format_value(&DynSolValue::Address(owner)),
            "0x4510108d3033173b84919F4941695d4190A0F40F"
        );
        assert_eq!(format_value(&DynSolValue::Bool(true)), "true");
        assert_eq!(
            format_value(&DynSolValue::Array(vec![
                DynSolValue::Uint(U256::from(1), 8),
                DynSolValue::Uint(U256::from(2), 8),
            ])),
            "[1, 2]"
        );
        assert_eq!(
            format_value(&DynSolValue::String("hi".to_string())),
            "\"hi\""
        );
    }
}
