//! Call trace model and the decoder that turns it into a presentable tree.

mod decoder;
mod entry;
mod error;
mod node;

pub use decoder::{call_label, TraceNodeDecoder, FALLBACK_LABEL};
pub use entry::{CallKind, ParseCallKindError, TraceEntry};
pub use error::{NodePath, TraceError};
pub use node::{CallDetail, DecodedTraceNode, NodePayload};
