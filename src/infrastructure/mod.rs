//! Infrastructure layer - External format integrations
//!
//! This layer contains:
//! - ABI scanning and decoding using alloy-dyn-abi
//! - Trace ingestion from geth callTracer frames and nested JSON

pub mod abi;
pub mod ethereum;

pub use abi::{AbiScanner, AlloyInputDecoder};
