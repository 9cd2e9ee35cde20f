//! Scripted in-memory node shared by the integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use ctfkit::{CallMessage, NodeApi, RawReceipt, RpcError};

pub const CHAIN_ID: u64 = 1337;
pub const GAS_PRICE: u128 = 2_000_000_000;
pub const ESTIMATED_GAS: u64 = 48_123;

/// Setup contract of the first challenge: `wallet()` and `isSolved()`
pub const SETUP_ABI: &str = r#"[
    {"type":"function","name":"wallet","inputs":[],"outputs":[{"name":"","type":"address","internalType":"contract Wallet"}],"stateMutability":"view"},
    {"type":"function","name":"isSolved","inputs":[],"outputs":[{"name":"","type":"bool","internalType":"bool"}],"stateMutability":"view"}
]"#;

pub const WALLET_ABI: &str = r#"[
    {"type":"function","name":"owner","inputs":[],"outputs":[{"name":"","type":"address"}],"stateMutability":"view"},
    {"type":"function","name":"setOwner","inputs":[],"outputs":[],"stateMutability":"nonpayable"},
    {"type":"function","name":"withdraw","inputs":[{"name":"to","type":"address"}],"outputs":[],"stateMutability":"nonpayable"}
]"#;

pub const SETUP_ADDRESS: &str = "0x09CE6D88e0191eEb3fa5CD9ED5518ad46b3EBeCC";
pub const WALLET_ADDRESS: &str = "0xe585809A9D52b6905ad014af286ac4B378d5a7d4";
pub const PLAYER_KEY: &str = "60566eee170a8a0dd4a587f225d95f449dd3943d7a4ec1aa2d96eec2d58d9441";

pub struct MockState {
    pub chain_id: u64,
    pub block_number: u64,
    pub call_results: HashMap<[u8; 4], Bytes>,
    pub estimate: Result<u64, RpcError>,
    pub gas_price: u128,
    pub tip: Result<u128, RpcError>,
    pub nonce: u64,
    pub send_error: Option<RpcError>,
    /// Hash to report instead of keccak256(raw)
    pub reported_hash: Option<B256>,
    pub storage: HashMap<(Address, U256), B256>,
    pub receipts: HashMap<B256, RawReceipt>,
    pub calls: Vec<CallMessage>,
    pub estimates: Vec<CallMessage>,
    pub sent: Vec<Vec<u8>>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            chain_id: CHAIN_ID,
            block_number: 17,
            call_results: HashMap::new(),
            estimate: Ok(ESTIMATED_GAS),
            gas_price: GAS_PRICE,
            tip: Ok(1_000_000_000),
            nonce: 0,
            send_error: None,
            reported_hash: None,
            storage: HashMap::new(),
            receipts: HashMap::new(),
            calls: Vec::new(),
            estimates: Vec::new(),
            sent: Vec::new(),
        }
    }
}

/// Cloneable handle; clones share state so tests can script and inspect it
#[derive(Clone, Default)]
pub struct MockNode {
    state: Arc<Mutex<MockState>>,
}

impl MockNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    /// Script the return data of the method with `selector`
    pub fn on_call(&self, selector: [u8; 4], output: impl Into<Bytes>) {
        self.state().call_results.insert(selector, output.into());
    }
}

pub fn reverted(message: &str) -> RpcError {
    RpcError::from_response(3, message, None)
}

#[async_trait::async_trait]
impl NodeApi for MockNode {
    async fn chain_id(&self) -> Result<u64, RpcError> {
        Ok(self.state().chain_id)
    }

    async fn latest_block_number(&self) -> Result<u64, RpcError> {
        Ok(self.state().block_number)
    }

    async fn call(&self, msg: &CallMessage) -> Result<Bytes, RpcError> {
        let mut state = self.state();
        state.calls.push(msg.clone());
        msg.selector()
            .and_then(|selector| state.call_results.get(&selector).cloned())
            .ok_or_else(|| reverted("execution reverted"))
    }

    async fn estimate_gas(&self, msg: &CallMessage) -> Result<u64, RpcError> {
        let mut state = self.state();
        state.estimates.push(msg.clone());
        state.estimate.clone()
    }

    async fn gas_price(&self) -> Result<u128, RpcError> {
        Ok(self.state().gas_price)
    }

    async fn max_priority_fee_per_gas(&self) -> Result<u128, RpcError> {
        self.state().tip.clone()
    }

    async fn pending_nonce(&self, _address: Address) -> Result<u64, RpcError> {
        Ok(self.state().nonce)
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<B256, RpcError> {
        let mut state = self.state();
        if let Some(err) = state.send_error.clone() {
            return Err(err);
        }
        state.sent.push(raw.to_vec());
        state.nonce += 1;
        Ok(state.reported_hash.unwrap_or_else(|| keccak256(raw)))
    }

    async fn transaction_receipt(&self, hash: B256) -> Result<Option<RawReceipt>, RpcError> {
        Ok(self.state().receipts.get(&hash).cloned())
    }

    async fn storage_at(&self, address: Address, slot: U256) -> Result<B256, RpcError> {
        Ok(self
            .state()
            .storage
            .get(&(address, slot))
            .copied()
            .unwrap_or_default())
    }

    fn endpoint_name(&self) -> String {
        "mock://node".to_string()
    }
}
