//! ABI infrastructure - Alloy-based ABI loading, encoding and decoding

mod args;
mod codec;
mod loader;

pub use args::{parse_args, parse_value};
pub use codec::{format_value, AlloyAbiCodec};
pub use loader::{load_interface, parse_interface};
