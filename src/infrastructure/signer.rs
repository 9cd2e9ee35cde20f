//! Local secp256k1 accounts backed by alloy-signer-local

use std::fmt;

use alloy::primitives::{Address, Signature, B256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;

use crate::address::strip_hex_prefix;
use crate::domain::Signer;
use crate::error::{Error, Result};

/// An account holding its private key in memory
#[derive(Clone)]
pub struct Account {
    signer: PrivateKeySigner,
}

impl Account {
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Export as `(checksummed address, 0x-prefixed private key hex)`
    pub fn export(&self) -> (String, String) {
        (
            self.address().to_checksum(None),
            format!("0x{}", hex::encode(self.signer.to_bytes())),
        )
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

impl Signer for Account {
    fn address(&self) -> Address {
        self.signer.address()
    }

    fn sign_hash(&self, hash: &B256) -> Result<Signature> {
        self.signer
            .sign_hash_sync(hash)
            .map_err(|e| Error::Signature(e.to_string()))
    }
}

/// Generate a fresh random account
pub fn create_account() -> Account {
    Account {
        signer: PrivateKeySigner::random(),
    }
}

/// Load an account from a hex private key, with or without `0x`
pub fn load_account(private_key: &str) -> Result<Account> {
    let payload = strip_hex_prefix(private_key.trim());
    let bytes = hex::decode(payload).map_err(|e| Error::InvalidKey(e.to_string()))?;
    if bytes.len() != 32 {
        return Err(Error::InvalidKey(format!(
            "expected 32 bytes, got {}",
            bytes.len()
        )));
    }

    let signer =
        PrivateKeySigner::from_slice(&bytes).map_err(|e| Error::InvalidKey(e.to_string()))?;
    Ok(Account { signer })
}
