//! Error types shared by the client, the ABI layer and the node adapter

use std::fmt;

use alloy_sol_types::{Panic, Revert, SolError};
use thiserror::Error;

use crate::address::strip_hex_prefix;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors surfaced by the library
#[derive(Debug, Error)]
pub enum Error {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("failed to parse contract interface: {0}")]
    Parse(String),

    #[error("method `{0}` not found in contract interface")]
    MethodNotFound(String),

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("decoding error: {0}")]
    Decoding(String),

    #[error("gas estimation failed: {0}")]
    GasEstimation(#[source] RpcError),

    /// Post-signing consistency failure. Points at a signing library defect,
    /// not at bad user input.
    #[error("signature error: {0}")]
    Signature(String),

    #[error("transaction rejected by node: {0}")]
    Submission(#[source] RpcError),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error("invalid private key: {0}")]
    InvalidKey(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Classification of a node error, computed once where the error enters the crate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcErrorKind {
    /// The simulated call reverted
    ExecutionReverted,
    /// The block base fee is above the requested gas limit
    BaseFeeExceedsGasLimit,
    /// The node does not implement the requested method
    MethodNotSupported,
    /// HTTP, serialization or connection failure (no JSON-RPC error object)
    Transport,
    Other,
}

/// A JSON-RPC failure reported by the node (or by the transport underneath it)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcError {
    pub kind: RpcErrorKind,
    pub code: Option<i64>,
    pub message: String,
    /// Raw `data` member of the error object, if any
    pub data: Option<String>,
}

impl RpcError {
    /// Build from a JSON-RPC error object
    pub fn from_response(code: i64, message: impl Into<String>, data: Option<String>) -> Self {
        let message = message.into();
        Self {
            kind: classify(Some(code), &message),
            code: Some(code),
            message,
            data,
        }
    }

    /// Build from a failure that never produced a JSON-RPC error object
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: RpcErrorKind::Transport,
            code: None,
            message: message.into(),
            data: None,
        }
    }

    pub fn is_reverted(&self) -> bool {
        self.kind == RpcErrorKind::ExecutionReverted
    }

    /// Decode a Solidity `Error(string)` or `Panic(uint256)` payload from `data`
    pub fn revert_reason(&self) -> Option<String> {
        let data = self.data.as_deref()?;
        let bytes = hex::decode(strip_hex_prefix(data.trim())).ok()?;
        if bytes.starts_with(&Revert::SELECTOR) {
            return Revert::abi_decode(&bytes).ok().map(|revert| revert.reason);
        }
        if bytes.starts_with(&Panic::SELECTOR) {
            return Panic::abi_decode(&bytes)
                .ok()
                .map(|panic| format!("panic code 0x{:x}", panic.code));
        }
        None
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} (code {})", self.message, code)?,
            None => write!(f, "{}", self.message)?,
        }
        if let Some(reason) = self.revert_reason() {
            write!(f, ": {}", reason)?;
        }
        Ok(())
    }
}

impl std::error::Error for RpcError {}

/// Map a JSON-RPC code and message onto an [`RpcErrorKind`].
///
/// Nodes disagree on codes, so the message is consulted as well. This is the
/// only place in the crate that inspects error wording.
pub fn classify(code: Option<i64>, message: &str) -> RpcErrorKind {
    let lower = message.to_ascii_lowercase();

    if lower.contains("base fee exceeds gas limit") {
        return RpcErrorKind::BaseFeeExceedsGasLimit;
    }
    if code == Some(3)
        || lower.contains("execution reverted")
        || lower.contains("vm exception while processing transaction: revert")
    {
        return RpcErrorKind::ExecutionReverted;
    }
    let names_missing_method = lower.contains("method")
        && (lower.contains("not supported")
            || lower.contains("not found")
            || lower.contains("does not exist"));
    if code == Some(-32601) || names_missing_method {
        return RpcErrorKind::MethodNotSupported;
    }
    RpcErrorKind::Other
}
