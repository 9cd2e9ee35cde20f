//! Ethereum infrastructure - Alloy node implementation

mod provider;
pub(crate) mod types;

pub use provider::{connect_http, AlloyNode, NodeApi, RawReceipt};
