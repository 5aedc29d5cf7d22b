//! Ethereum infrastructure - trace ingestion from node and explorer formats

mod json;
mod nested;
mod types;

pub use nested::{parse_nested_trace, RawTraceEntry};
pub use types::{convert_call_frame, convert_geth_trace, parse_geth_trace};
