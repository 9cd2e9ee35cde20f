//! ABI codec trait

use alloy_dyn_abi::DynSolValue;

use super::MethodSpec;
use crate::error::Result;

/// A value decoded from contract output
pub type DecodedValue = DynSolValue;

/// Trait for ABI encoding/decoding implementations
///
/// The pipeline only talks to this trait, so the alloy-dyn-abi backed
/// implementation can be swapped out without touching it.
pub trait AbiCodec: Send + Sync {
    /// Encode a call: the 4-byte selector followed by the encoded arguments,
    /// or the selector alone when the method takes no arguments.
    ///
    /// Fails with `Error::Encoding` on an arity or type mismatch.
    fn encode_call(&self, method: &MethodSpec, args: &[DynSolValue]) -> Result<Vec<u8>>;

    /// Decode raw `eth_call` output into the method's outputs, in declared order
    fn decode_output(&self, method: &MethodSpec, data: &[u8]) -> Result<Vec<DecodedValue>>;
}
