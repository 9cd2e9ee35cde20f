//! ctfkit: a small helper over an Ethereum JSON-RPC node.
//!
//! Connects to a node, loads contract interfaces from ABI JSON, runs
//! read-only calls and submits signed legacy transactions.

pub mod address;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use address::{parse_address, parse_slot, parse_tx_hash, strip_hex_prefix};
pub use client::{
    receipt_status, validate_signature_values, Client, TxHash, BASELINE_GAS_PRICE,
    DEFAULT_NODE_URL, FALLBACK_GAS_LIMIT,
};
pub use domain::abi::{AbiCodec, ContractInterface, DecodedValue, MethodSpec, ParamSpec};
pub use domain::{CallMessage, Signer};
pub use error::{Error, Result, RpcError, RpcErrorKind};
pub use infrastructure::abi::{format_value, load_interface, parse_args, parse_interface};
pub use infrastructure::ethereum::{NodeApi, RawReceipt};
pub use infrastructure::runtime::BlockingClient;
pub use infrastructure::signer::{create_account, load_account, Account};
