//! Client - lazily connected handle over a node plus an ABI codec
//!
//! The read passthroughs live here; the call/transaction pipeline is in
//! [`pipeline`].

mod pipeline;

use alloy_primitives::{Address, B256, U256};
use tracing::debug;

use crate::domain::abi::AbiCodec;
use crate::error::{Error, Result};
use crate::infrastructure::abi::AlloyAbiCodec;
use crate::infrastructure::ethereum::{connect_http, NodeApi, RawReceipt};

pub use pipeline::validate_signature_values;

/// Node used when no URL is configured
pub const DEFAULT_NODE_URL: &str = "http://127.0.0.1:8545";

/// Gas limit used when estimation reverts
pub const FALLBACK_GAS_LIMIT: u64 = 210_000;

/// Gas price set after a successful estimate (30 gwei); the node price replaces it
pub const BASELINE_GAS_PRICE: u128 = 30_000_000_000;

pub type TxHash = B256;

/// Handle to one Ethereum node.
///
/// Every operation connects on first use with the stored URL. Methods take
/// `&mut self`; a single client is not meant to be shared between tasks.
pub struct Client {
    peer_url: String,
    node: Option<Box<dyn NodeApi>>,
    codec: Box<dyn AbiCodec>,
}

impl Client {
    /// Create an unconnected client for `url`
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            peer_url: url.into(),
            node: None,
            codec: Box::new(AlloyAbiCodec::new()),
        }
    }

    /// Create a client over an already-connected node
    pub fn with_node(node: Box<dyn NodeApi>) -> Self {
        Self {
            peer_url: node.endpoint_name(),
            node: Some(node),
            codec: Box::new(AlloyAbiCodec::new()),
        }
    }

    /// Replace the ABI codec
    pub fn with_codec(mut self, codec: Box<dyn AbiCodec>) -> Self {
        self.codec = codec;
        self
    }

    pub fn peer_url(&self) -> &str {
        &self.peer_url
    }

    pub fn is_connected(&self) -> bool {
        self.node.is_some()
    }

    /// Connect to `url`, replacing any previous connection
    pub async fn connect(&mut self, url: &str) -> Result<()> {
        let node = connect_http(url).await?;
        self.peer_url = url.trim().to_string();
        self.node = Some(Box::new(node));
        Ok(())
    }

    /// Connect with the stored URL
    pub async fn init(&mut self) -> Result<()> {
        let url = self.peer_url.clone();
        self.connect(&url).await
    }

    async fn ensure_connected(&mut self) -> Result<()> {
        if self.node.is_none() {
            debug!(url = %self.peer_url, "connecting lazily");
            self.init().await?;
        }
        Ok(())
    }

    /// Connected node and codec, borrowed together
    async fn parts(&mut self) -> Result<(&dyn NodeApi, &dyn AbiCodec)> {
        self.ensure_connected().await?;
        let node = self
            .node
            .as_deref()
            .ok_or_else(|| Error::Connection(format!("not connected to {}", self.peer_url)))?;
        Ok((node, self.codec.as_ref()))
    }

    /// Height of the latest block
    pub async fn latest_block_height(&mut self) -> Result<u64> {
        let (node, _) = self.parts().await?;
        Ok(node.latest_block_number().await?)
    }

    /// Raw 32-byte storage word at the latest block
    pub async fn get_storage_at(&mut self, address: Address, slot: U256) -> Result<B256> {
        let (node, _) = self.parts().await?;
        Ok(node.storage_at(address, slot).await?)
    }

    /// Receipt as returned by the node, `None` while pending
    pub async fn get_transaction_receipt(&mut self, hash: TxHash) -> Result<Option<RawReceipt>> {
        let (node, _) = self.parts().await?;
        Ok(node.transaction_receipt(hash).await?)
    }
}

/// Read the `status` field of a raw receipt: `Some(true)` on success
pub fn receipt_status(receipt: &RawReceipt) -> Option<bool> {
    let status = receipt.get("status")?.as_str()?;
    match crate::infrastructure::ethereum::types::parse_hex_u64(status).ok()? {
        0 => Some(false),
        1 => Some(true),
        _ => None,
    }
}
