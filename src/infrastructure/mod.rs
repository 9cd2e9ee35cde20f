//! Infrastructure layer - External service integrations
//!
//! This layer contains:
//! - The Alloy-based node implementation
//! - ABI loading and encoding using alloy-dyn-abi
//! - Local key management
//! - A blocking runtime facade over the async client

pub mod abi;
pub mod ethereum;
pub mod runtime;
pub mod signer;
