//! ABI domain models and contracts
//!
//! This module defines selector extraction, the signature catalog and the
//! input decoding contract, independent of the underlying implementation
//! (alloy-dyn-abi).

mod decoder;
mod registry;
mod selector;

pub use decoder::{DecodeResult, DecodedParam, InputDecoder};
pub use registry::{ParamSpec, SignatureCatalog, SignatureEntry};
pub use selector::{extract_selector, parse_selector, selector_hex};
