//! Domain layer - trace decoding and address naming, independent of how
//! traces and lookup tables are obtained.

pub mod abi;
pub mod address;
pub mod trace;

pub use abi::{SignatureCatalog, SignatureEntry};
pub use address::{AddressResolutionRegistry, RendererRegistry};
pub use trace::{CallKind, DecodedTraceNode, TraceEntry, TraceError, TraceNodeDecoder};

/// Read-only lookup tables for one decode pass
///
/// Refreshing means building a new snapshot; an in-flight pass keeps the one
/// it started with.
#[derive(Debug, Default, Clone)]
pub struct LookupTables {
    pub signatures: SignatureCatalog,
    pub addresses: AddressResolutionRegistry,
}

impl LookupTables {
    pub fn new(signatures: SignatureCatalog, addresses: AddressResolutionRegistry) -> Self {
        Self {
            signatures,
            addresses,
        }
    }
}
