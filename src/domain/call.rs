//! Call message - the transient request shared by eth_call, gas estimation and signing

use alloy_primitives::{Address, Bytes, U256};

/// Parameters of a single contract interaction.
///
/// `data` always starts with the 4-byte method selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallMessage {
    pub from: Address,
    pub to: Address,
    /// Gas limit; zero leaves execution unbounded on read calls
    pub gas: u64,
    pub gas_price: Option<u128>,
    pub gas_fee_cap: Option<u128>,
    /// Unset when the node has no fee market support
    pub gas_tip_cap: Option<u128>,
    pub value: U256,
    pub data: Bytes,
}

impl CallMessage {
    /// A zero-value, zero-gas message with no call data yet
    pub fn new(from: Address, to: Address) -> Self {
        Self {
            from,
            to,
            gas: 0,
            gas_price: None,
            gas_fee_cap: None,
            gas_tip_cap: None,
            value: U256::ZERO,
            data: Bytes::new(),
        }
    }

    pub fn selector(&self) -> Option<[u8; 4]> {
        self.data.get(..4).and_then(|s| s.try_into().ok())
    }
}
