//! Node abstraction and the Alloy HTTP implementation
//!
//! Every method maps onto exactly one JSON-RPC call. Errors leave this module
//! already classified, so callers branch on `RpcErrorKind` instead of text.

use alloy::eips::BlockId;
use alloy::primitives::{Address, Bytes, TxKind, B256, U256};
use alloy::providers::{Provider, ProviderBuilder, RootProvider};
use alloy::rpc::types::{TransactionInput, TransactionRequest};
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

use crate::domain::CallMessage;
use crate::error::{Error, RpcError};
use crate::infrastructure::ethereum::types::{convert_transport_error, parse_hex_u64};

/// Raw JSON receipt object, as returned by the node
pub type RawReceipt = Map<String, Value>;

/// Abstract Ethereum node
///
/// This trait defines every node operation the pipeline needs,
/// abstracting over the specific Alloy transport.
#[async_trait::async_trait]
pub trait NodeApi: Send + Sync + 'static {
    /// `eth_chainId`
    async fn chain_id(&self) -> Result<u64, RpcError>;

    /// Height of the latest block, read from its header
    async fn latest_block_number(&self) -> Result<u64, RpcError>;

    /// `eth_call` against the pending state
    async fn call(&self, msg: &CallMessage) -> Result<Bytes, RpcError>;

    /// `eth_estimateGas`
    async fn estimate_gas(&self, msg: &CallMessage) -> Result<u64, RpcError>;

    /// `eth_gasPrice`
    async fn gas_price(&self) -> Result<u128, RpcError>;

    /// `eth_maxPriorityFeePerGas`
    async fn max_priority_fee_per_gas(&self) -> Result<u128, RpcError>;

    /// Next unused nonce, counting pending transactions
    async fn pending_nonce(&self, address: Address) -> Result<u64, RpcError>;

    /// `eth_sendRawTransaction`; returns the hash reported by the node
    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<B256, RpcError>;

    /// `eth_getTransactionReceipt`; `None` while the transaction is pending
    async fn transaction_receipt(&self, hash: B256) -> Result<Option<RawReceipt>, RpcError>;

    /// `eth_getStorageAt` at the latest block
    async fn storage_at(&self, address: Address, slot: U256) -> Result<B256, RpcError>;

    /// Get endpoint display name
    fn endpoint_name(&self) -> String;
}

/// HTTP JSON-RPC node backed by an Alloy root provider (no fillers)
pub struct AlloyNode {
    provider: RootProvider,
    endpoint: String,
}

/// Connect to an HTTP(S) endpoint and probe it with `eth_chainId`.
///
/// Fails on an empty or malformed URL, or when the node does not answer.
pub async fn connect_http(url: &str) -> Result<AlloyNode, Error> {
    let endpoint = url.trim();
    if endpoint.is_empty() {
        return Err(Error::Connection("empty node URL".to_string()));
    }

    let rpc_url: Url = endpoint
        .parse()
        .map_err(|e| Error::Connection(format!("invalid node URL '{}': {}", endpoint, e)))?;
    let provider = ProviderBuilder::new()
        .disable_recommended_fillers()
        .connect_http(rpc_url);

    let node = AlloyNode {
        provider,
        endpoint: endpoint.to_string(),
    };

    let chain_id = node
        .chain_id()
        .await
        .map_err(|e| Error::Connection(format!("node at {} is unreachable: {}", endpoint, e)))?;
    debug!(endpoint, chain_id, "connected to node");

    Ok(node)
}

/// Build the JSON-RPC call object for a message
fn to_request(msg: &CallMessage) -> TransactionRequest {
    TransactionRequest {
        from: Some(msg.from),
        to: Some(TxKind::Call(msg.to)),
        // zero means "let the node decide"
        gas: (msg.gas > 0).then_some(msg.gas),
        gas_price: msg.gas_price,
        value: Some(msg.value),
        input: TransactionInput::new(msg.data.clone()),
        ..Default::default()
    }
}

#[async_trait::async_trait]
impl NodeApi for AlloyNode {
    async fn chain_id(&self) -> Result<u64, RpcError> {
        self.provider
            .get_chain_id()
            .await
            .map_err(convert_transport_error)
    }

    async fn latest_block_number(&self) -> Result<u64, RpcError> {
        // Header fetch, same as eth_getBlockByNumber("latest") without transactions
        let json: Value = self
            .provider
            .raw_request("eth_getBlockByNumber".into(), ("latest", false))
            .await
            .map_err(convert_transport_error)?;

        let number = json
            .get("number")
            .and_then(|v| v.as_str())
            .ok_or_else(|| RpcError::transport("latest block has no number field"))?;
        parse_hex_u64(number).map_err(|e| RpcError::transport(e.to_string()))
    }

    async fn call(&self, msg: &CallMessage) -> Result<Bytes, RpcError> {
        self.provider
            .call(to_request(msg))
            .block(BlockId::pending())
            .await
            .map_err(convert_transport_error)
    }

    async fn estimate_gas(&self, msg: &CallMessage) -> Result<u64, RpcError> {
        self.provider
            .estimate_gas(to_request(msg))
            .await
            .map_err(convert_transport_error)
    }

    async fn gas_price(&self) -> Result<u128, RpcError> {
        self.provider
            .get_gas_price()
            .await
            .map_err(convert_transport_error)
    }

    async fn max_priority_fee_per_gas(&self) -> Result<u128, RpcError> {
        self.provider
            .get_max_priority_fee_per_gas()
            .await
            .map_err(convert_transport_error)
    }

    async fn pending_nonce(&self, address: Address) -> Result<u64, RpcError> {
        self.provider
            .get_transaction_count(address)
            .pending()
            .await
            .map_err(convert_transport_error)
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<B256, RpcError> {
        let pending = self
            .provider
            .send_raw_transaction(raw)
            .await
            .map_err(convert_transport_error)?;
        Ok(*pending.tx_hash())
    }

    async fn transaction_receipt(&self, hash: B256) -> Result<Option<RawReceipt>, RpcError> {
        self.provider
            .raw_request("eth_getTransactionReceipt".into(), (hash,))
            .await
            .map_err(convert_transport_error)
    }

    async fn storage_at(&self, address: Address, slot: U256) -> Result<B256, RpcError> {
        let value = self
            .provider
            .get_storage_at(address, slot)
            .await
            .map_err(convert_transport_error)?;
        Ok(B256::from(value))
    }

    fn endpoint_name(&self) -> String {
        self.endpoint.clone()
    }
}
