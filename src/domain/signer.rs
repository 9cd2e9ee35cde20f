//! Signer trait

use alloy_primitives::{Address, Signature, B256};

use crate::error::Result;

/// Something that can sign transaction hashes on behalf of an address
pub trait Signer: Send + Sync {
    /// The address the signatures are expected to recover to
    fn address(&self) -> Address;

    /// Sign a 32-byte prehash
    fn sign_hash(&self, hash: &B256) -> Result<Signature>;
}
