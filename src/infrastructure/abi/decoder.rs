//! Input decoder implementation using alloy-dyn-abi

use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::{Bytes, Selector, U256};
use anyhow::{bail, Context, Result};
use tracing::debug;

use crate::domain::abi::{selector_hex, DecodeResult, DecodedParam, InputDecoder, SignatureEntry};

/// Stateless ABI decoder backed by alloy-dyn-abi
#[derive(Debug, Default, Clone, Copy)]
pub struct AlloyInputDecoder;

impl AlloyInputDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl InputDecoder for AlloyInputDecoder {
    fn decode(
        &self,
        selector: Option<Selector>,
        signature: Option<&SignatureEntry>,
        input: &[u8],
        context_value: U256,
    ) -> DecodeResult {
        let Some(selector) = selector else {
            return DecodeResult::NoSelector;
        };
        let Some(signature) = signature else {
            return DecodeResult::UnknownSelector { selector };
        };

        let tail = input.get(4..).unwrap_or_default();

        match decode_params(selector, signature, tail) {
            Ok(params) => DecodeResult::Decoded {
                signature: signature.clone(),
                params,
                value: context_value,
            },
            Err(err) => {
                debug!(
                    selector = %selector_hex(selector),
                    signature = %signature.signature,
                    error = %format!("{err:#}"),
                    "input does not match signature"
                );
                DecodeResult::DecodeFailed {
                    signature: signature.clone(),
                    tail: Bytes::copy_from_slice(tail),
                    reason: format!("{err:#}"),
                }
            }
        }
    }
}

/// Decode the bytes after the selector against the signature's inputs
fn decode_params(
    selector: Selector,
    signature: &SignatureEntry,
    args_data: &[u8],
) -> Result<Vec<DecodedParam>> {
    if selector != signature.selector {
        bail!(
            "selector mismatch: got {}, expected {}",
            selector_hex(selector),
            signature.selector_hex()
        );
    }

    let types: Vec<DynSolType> = signature
        .inputs
        .iter()
        .map(|param| {
            param.kind.parse::<DynSolType>().with_context(|| {
                format!("Failed to parse type '{}' for param '{}'", param.kind, param.name)
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if types.is_empty() {
        return Ok(Vec::new());
    }

    let decoded = DynSolType::Tuple(types)
        .abi_decode_params(args_data)
        .context("Failed to decode calldata")?;

    let values = match decoded {
        DynSolValue::Tuple(values) => values,
        other => vec![other],
    };

    Ok(signature
        .inputs
        .iter()
        .zip(values.iter())
        .enumerate()
        .map(|(idx, (param, value))| {
            let name = if param.name.trim().is_empty() {
                format!("arg{}", idx)
            } else {
                param.name.clone()
            };

            DecodedParam {
                name,
                kind: param.kind.clone(),
                value: format_dyn_sol_value(value),
            }
        })
        .collect())
}

/// Format a DynSolValue for display
pub fn format_dyn_sol_value(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::Int(i, _) => i.to_string(),
        DynSolValue::Uint(u, _) => {
            let s = u.to_string();
            // For very large numbers, show hex instead
            if s.len() > 20 {
                format!("0x{:x}", u)
            } else {
                s
            }
        }
        DynSolValue::FixedBytes(word, size) => {
            let bytes = &word.as_slice()[..(*size).min(32)];
            format!("0x{}", hex::encode(bytes))
        }
        DynSolValue::Address(addr) => addr.to_checksum(None),
        DynSolValue::Function(func) => format!("0x{}", hex::encode(func.as_slice())),
        DynSolValue::Bytes(bytes) => {
            if bytes.len() <= 32 {
                format!("0x{}", hex::encode(bytes))
            } else {
                format!("0x{}… ({} bytes)", hex::encode(&bytes[..32]), bytes.len())
            }
        }
        DynSolValue::String(s) => {
            let chars = s.chars().count();
            if chars <= 64 {
                format!("\"{}\"", s)
            } else {
                let head: String = s.chars().take(64).collect();
                format!("\"{}…\" ({} chars)", head, chars)
            }
        }
        DynSolValue::Array(arr) | DynSolValue::FixedArray(arr) => {
            let max_items = 10;
            let items: Vec<String> = arr
                .iter()
                .take(max_items)
                .map(format_dyn_sol_value)
                .collect();
            if arr.len() > max_items {
                format!("[{}, …] ({} items)", items.join(", "), arr.len())
            } else {
                format!("[{}]", items.join(", "))
            }
        }
        DynSolValue::Tuple(fields) => {
            let items: Vec<String> = fields.iter().map(format_dyn_sol_value).collect();
            format!("({})", items.join(", "))
        }
        #[allow(unreachable_patterns)]
        other => format!("{:?}", other),
    }
}
