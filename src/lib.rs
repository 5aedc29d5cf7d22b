//! Call-trace decoding for EVM transactions
//!
//! Turns a raw call tree into a presentation-ready tree: function names and
//! parameters from a signature catalog, addresses rendered through pluggable
//! name resolvers.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod modules;
pub mod store;

pub use domain::{
    AddressResolutionRegistry, CallKind, DecodedTraceNode, LookupTables, RendererRegistry,
    SignatureCatalog, SignatureEntry, TraceEntry, TraceError, TraceNodeDecoder,
};
pub use infrastructure::AlloyInputDecoder;
