//! Domain layer - value types and the seams the pipeline is written against

pub mod abi;
mod call;
mod signer;

pub use call::CallMessage;
pub use signer::Signer;
