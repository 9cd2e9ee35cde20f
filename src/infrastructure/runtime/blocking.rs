//! Blocking facade - drives the async client on a private current-thread runtime

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{Address, B256, U256};
use tokio::runtime::{Builder, Runtime};

use crate::client::{Client, TxHash};
use crate::domain::abi::{ContractInterface, DecodedValue};
use crate::domain::Signer;
use crate::error::Result;
use crate::infrastructure::ethereum::RawReceipt;

/// Synchronous wrapper over [`Client`].
///
/// Each call blocks the current thread until the node answers. Must not be
/// used from inside another Tokio runtime.
pub struct BlockingClient {
    runtime: Runtime,
    inner: Client,
}

impl BlockingClient {
    /// Create an unconnected client for `url`
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::from_client(Client::new(url))
    }

    pub fn from_client(inner: Client) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self { runtime, inner })
    }

    pub fn client(&self) -> &Client {
        &self.inner
    }

    pub fn connect(&mut self, url: &str) -> Result<()> {
        self.runtime.block_on(self.inner.connect(url))
    }

    pub fn init(&mut self) -> Result<()> {
        self.runtime.block_on(self.inner.init())
    }

    pub fn latest_block_height(&mut self) -> Result<u64> {
        self.runtime.block_on(self.inner.latest_block_height())
    }

    pub fn get_storage_at(&mut self, address: Address, slot: U256) -> Result<B256> {
        self.runtime.block_on(self.inner.get_storage_at(address, slot))
    }

    pub fn get_transaction_receipt(&mut self, hash: TxHash) -> Result<Option<RawReceipt>> {
        self.runtime.block_on(self.inner.get_transaction_receipt(hash))
    }

    pub fn query(
        &mut self,
        from: Address,
        to: Address,
        abi: &ContractInterface,
        method: &str,
        args: &[DynSolValue],
    ) -> Result<Vec<DecodedValue>> {
        self.runtime
            .block_on(self.inner.query(from, to, abi, method, args))
    }

    pub fn submit_transaction<S>(
        &mut self,
        account: &S,
        to: Address,
        abi: &ContractInterface,
        method: &str,
        args: &[DynSolValue],
    ) -> Result<TxHash>
    where
        S: Signer + ?Sized,
    {
        self.runtime
            .block_on(self.inner.submit_transaction(account, to, abi, method, args))
    }
}
