//! Input decoder trait and types

use alloy_primitives::{Bytes, Selector, U256};
use serde::Serialize;

use super::SignatureEntry;

/// A decoded function argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedParam {
    /// Parameter name (or "arg{n}" if unnamed)
    pub name: String,
    /// Solidity type (e.g., "address", "uint256", "(uint256,address)")
    pub kind: String,
    /// Decoded value as a formatted string
    pub value: String,
}

/// Outcome of decoding one call input
///
/// Every variant is displayable; only `Decoded` carries parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DecodeResult {
    /// Input too short to hold a selector (plain value transfer)
    NoSelector,
    /// Selector not present in the catalog
    UnknownSelector { selector: Selector },
    /// Signature known but the bytes after the selector don't match it
    DecodeFailed {
        signature: SignatureEntry,
        tail: Bytes,
        reason: String,
    },
    /// Fully decoded call
    Decoded {
        signature: SignatureEntry,
        params: Vec<DecodedParam>,
        value: U256,
    },
}

impl DecodeResult {
    /// Signature the input was matched against, if any
    pub fn signature(&self) -> Option<&SignatureEntry> {
        match self {
            Self::DecodeFailed { signature, .. } | Self::Decoded { signature, .. } => {
                Some(signature)
            }
            Self::NoSelector | Self::UnknownSelector { .. } => None,
        }
    }

    /// Decoded parameters, empty unless fully decoded
    pub fn params(&self) -> &[DecodedParam] {
        match self {
            Self::Decoded { params, .. } => params,
            _ => &[],
        }
    }

    pub fn is_decoded(&self) -> bool {
        matches!(self, Self::Decoded { .. })
    }
}

/// Trait for input decoding implementations
///
/// Implementations must be pure: the same arguments always produce the same
/// result, so callers may decode lazily and repeatedly.
pub trait InputDecoder: Send + Sync {
    /// Decode call input against an optional signature
    ///
    /// # Arguments
    /// * `selector` - The extracted 4-byte selector, `None` for value-only calls
    /// * `signature` - The catalog entry for the selector, if known
    /// * `input` - The full call input (including the 4-byte selector)
    /// * `context_value` - Value transferred with the call
    fn decode(
        &self,
        selector: Option<Selector>,
        signature: Option<&SignatureEntry>,
        input: &[u8],
        context_value: U256,
    ) -> DecodeResult;
}
