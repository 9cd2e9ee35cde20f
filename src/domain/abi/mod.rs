//! ABI domain models and contracts
//!
//! This module defines the method table and the codec trait,
//! independent of the underlying implementation (alloy-dyn-abi).

mod codec;
mod interface;

pub use codec::{AbiCodec, DecodedValue};
pub use interface::{ContractInterface, MethodSpec, ParamSpec};
