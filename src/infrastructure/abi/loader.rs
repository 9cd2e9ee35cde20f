//! ABI loader - parses JSON interface descriptions into a method table

use std::fs;
use std::path::Path;

use alloy_dyn_abi::DynSolType;
use alloy_json_abi::{JsonAbi, Param};
use alloy_primitives::keccak256;
use tracing::debug;

use crate::domain::abi::{ContractInterface, MethodSpec, ParamSpec};
use crate::error::{Error, Result};

/// Parse ABI JSON text into a [`ContractInterface`].
///
/// Accepts either a raw ABI array or a build artifact with an `abi` field.
pub fn parse_interface(json: &str) -> Result<ContractInterface> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| Error::Parse(e.to_string()))?;

    let abi_value = if value.is_array() {
        value
    } else if let Some(abi) = value.get("abi") {
        abi.clone()
    } else {
        return Err(Error::Parse(
            "expected an ABI array or an object with an `abi` field".to_string(),
        ));
    };

    let abi: JsonAbi = serde_json::from_value(abi_value).map_err(|e| Error::Parse(e.to_string()))?;

    let mut interface = ContractInterface::new();
    for function in abi.functions() {
        let signature = function.signature();
        let method = MethodSpec {
            selector: compute_selector(&signature),
            name: function.name.clone(),
            signature,
            inputs: param_specs(&function.inputs)?,
            outputs: param_specs(&function.outputs)?,
        };
        let key = interface.insert(method);
        debug!(method = %key, "loaded ABI method");
    }

    Ok(interface)
}

/// Read and parse an ABI file
pub fn load_interface(path: impl AsRef<Path>) -> Result<ContractInterface> {
    let content = fs::read_to_string(path.as_ref())?;
    parse_interface(&content)
}

/// Convert JSON ABI params, rejecting types the codec cannot resolve
fn param_specs(params: &[Param]) -> Result<Vec<ParamSpec>> {
    params
        .iter()
        .map(|param| {
            let kind = param.selector_type().into_owned();
            kind.parse::<DynSolType>().map_err(|e| {
                Error::Parse(format!(
                    "unsupported type '{}' for param '{}': {}",
                    kind, param.name, e
                ))
            })?;
            Ok(ParamSpec {
                name: param.name.clone(),
                kind,
            })
        })
        .collect()
}

/// Compute the 4-byte function selector from a signature
fn compute_selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}
