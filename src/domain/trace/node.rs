//! Decoded trace tree

use std::borrow::Cow;

use alloy_primitives::{Bytes, Selector, U256};
use serde::Serialize;

use super::{CallKind, NodePath};
use crate::domain::abi::{DecodeResult, InputDecoder, SignatureEntry};
use crate::domain::address::DisplayUnit;

/// Function call details for CALL-family frames
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallDetail {
    pub selector: Option<Selector>,
    pub signature: Option<SignatureEntry>,
    /// Function name, raw selector, or the fallback marker
    pub label: String,
    /// Value sent with the call, present only when non-zero
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
    /// Whether the input carries anything past the selector
    pub has_params: bool,
    pub input: Bytes,
    /// Parameters decoded up front, when the decoder was asked to expand
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decoded: Option<DecodeResult>,
}

impl CallDetail {
    /// Decode the input on demand
    ///
    /// Pure: calling this any number of times yields the same result.
    pub fn decode_input(&self, decoder: &dyn InputDecoder) -> DecodeResult {
        decoder.decode(
            self.selector,
            self.signature.as_ref(),
            &self.input,
            self.value.unwrap_or_default(),
        )
    }

    /// Eagerly decoded result if present, otherwise decode now
    pub fn resolve_input<'a>(&'a self, decoder: &dyn InputDecoder) -> Cow<'a, DecodeResult> {
        match &self.decoded {
            Some(result) => Cow::Borrowed(result),
            None => Cow::Owned(self.decode_input(decoder)),
        }
    }
}

/// Per-kind payload of a decoded node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum NodePayload {
    Call(CallDetail),
    /// Constructor bytecode, kept verbatim
    Create { init_code: Bytes },
    SelfDestruct,
}

/// A trace node ready for presentation, mirroring the input tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedTraceNode {
    pub path: NodePath,
    pub kind: CallKind,
    pub target: Option<DisplayUnit>,
    pub payload: NodePayload,
    pub children: Vec<DecodedTraceNode>,
}

impl DecodedTraceNode {
    pub fn call(&self) -> Option<&CallDetail> {
        match &self.payload {
            NodePayload::Call(detail) => Some(detail),
            _ => None,
        }
    }

    /// Self-destruct frames are terminal and destructive
    pub fn is_destructive(&self) -> bool {
        matches!(self.payload, NodePayload::SelfDestruct)
    }

    /// Visit this node and its descendants depth-first, in execution order
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a DecodedTraceNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}
