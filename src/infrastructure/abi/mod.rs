//! ABI infrastructure - Alloy-based ABI scanning and decoding

mod decoder;
mod scanner;

pub use decoder::{format_dyn_sol_value, AlloyInputDecoder};
pub use scanner::{AbiScanner, ScanReport};
