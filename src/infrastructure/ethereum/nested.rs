//! Nested JSON traces with hex-encoded fields
//!
//! ```json
//! {
//!   "type": "CALL",
//!   "to": "0x…",
//!   "input": "0xa9059cbb…",
//!   "value": "0x0",
//!   "children": [ … ]
//! }
//! ```

use std::str::FromStr;

use alloy_primitives::{Address, Bytes, U256};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::json::from_deep_str;
use crate::domain::trace::{CallKind, NodePath, TraceEntry, TraceError};

/// A trace node exactly as it appears on the wire
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTraceEntry {
    #[serde(rename = "type", default)]
    pub typ: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub input: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default, alias = "calls")]
    pub children: Vec<RawTraceEntry>,
}

impl RawTraceEntry {
    /// Validate and convert into a typed trace tree
    pub fn to_entry(&self) -> Result<TraceEntry, TraceError> {
        self.convert(&mut Vec::new())
    }

    /// `indices` is the position of `self`; a `NodePath` is only built for errors
    fn convert(&self, indices: &mut Vec<usize>) -> Result<TraceEntry, TraceError> {
        let path = || NodePath::from_indices(indices);

        let typ = self.typ.as_deref().ok_or_else(|| TraceError::MissingField {
            path: path(),
            field: "type",
        })?;
        let kind = typ
            .parse::<CallKind>()
            .map_err(|err| TraceError::UnknownCallKind {
                path: path(),
                kind: err.0,
            })?;

        let input = self.input.as_deref().ok_or_else(|| TraceError::MissingField {
            path: path(),
            field: "input",
        })?;
        let input = parse_hex_bytes(input).map_err(|reason| TraceError::InvalidHex {
            path: path(),
            field: "input",
            reason,
        })?;

        let target = match self.to.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(to) => Some(Address::from_str(to).map_err(|_| TraceError::InvalidAddress {
                path: path(),
                value: to.to_string(),
            })?),
        };

        let value = match self.value.as_deref().map(str::trim) {
            None | Some("") => U256::ZERO,
            Some(value) => U256::from_str(value).map_err(|_| TraceError::InvalidValue {
                path: path(),
                value: value.to_string(),
            })?,
        };

        let mut children = Vec::with_capacity(self.children.len());
        for (index, child) in self.children.iter().enumerate() {
            indices.push(index);
            let converted = child.convert(indices);
            indices.pop();
            children.push(converted?);
        }

        Ok(TraceEntry {
            kind,
            target,
            input,
            value,
            children,
        })
    }
}

/// Parse a nested JSON trace document of any depth
pub fn parse_nested_trace(json: &str) -> Result<TraceEntry> {
    let raw: RawTraceEntry = from_deep_str(json).context("Failed to parse trace JSON")?;
    Ok(raw.to_entry()?)
}

fn parse_hex_bytes(value: &str) -> Result<Bytes, String> {
    let trimmed = value.trim();
    let payload = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    hex::decode(payload)
        .map(Bytes::from)
        .map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested() {
        let json = r#"{
            "type": "CALL",
            "to": "0x2222222222222222222222222222222222222222",
            "input": "0xd0e30db0",
            "value": "1000",
            "children": [
                {"type": "create2", "to": "0x3333333333333333333333333333333333333333", "input": "0x6080"},
                {"type": "SELFDESTRUCT", "input": "0x"}
            ]
        }"#;

        let entry = parse_nested_trace(json).unwrap();
        assert_eq!(entry.kind, CallKind::Call);
        assert_eq!(entry.value, U256::from(1000));
        assert_eq!(entry.input.as_ref(), &[0xd0, 0xe3, 0x0d, 0xb0]);
        assert_eq!(entry.children[0].kind, CallKind::Create2);
        assert!(entry.children[1].target.is_none());
    }

    #[test]
    fn test_invalid_hex_is_structural() {
        let json = r#"{
            "type": "CALL",
            "to": "0x2222222222222222222222222222222222222222",
            "input": "0x",
            "children": [
                {"type": "STATICCALL", "to": "0x2222222222222222222222222222222222222222", "input": "0xabc"}
            ]
        }"#;

        let err = parse_nested_trace(json).unwrap_err();
        let err = err.downcast::<TraceError>().unwrap();
        assert!(matches!(
            err,
            TraceError::InvalidHex { ref path, field: "input", .. } if path.to_string() == "0"
        ));
    }

    #[test]
    fn test_missing_input_is_structural() {
        let raw = RawTraceEntry {
            typ: Some("CALL".to_string()),
            to: Some("0x2222222222222222222222222222222222222222".to_string()),
            ..Default::default()
        };
        assert_eq!(
            raw.to_entry().unwrap_err(),
            TraceError::MissingField {
                path: NodePath::root(),
                field: "input",
            }
        );
    }

    #[test]
    fn test_bad_address_and_value() {
        let raw = RawTraceEntry {
            typ: Some("CALL".to_string()),
            to: Some("0x1234".to_string()),
            input: Some("0x".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            raw.to_entry(),
            Err(TraceError::InvalidAddress { .. })
        ));

        let raw = RawTraceEntry {
            typ: Some("CALL".to_string()),
            input: Some("0x".to_string()),
            value: Some("lots".to_string()),
            ..Default::default()
        };
        assert!(matches!(raw.to_entry(), Err(TraceError::InvalidValue { .. })));
    }

    fn nested_json(depth: usize) -> String {
        let to = "0x2222222222222222222222222222222222222222";
        let frame = format!(r#"{{"type": "CALL", "to": "{to}", "input": "0x", "children": ["#);
        let leaf = format!(r#"{{"type": "STATICCALL", "to": "{to}", "input": "0x"}}"#);
        format!("{}{}{}", frame.repeat(depth), leaf, "]}".repeat(depth))
    }

    #[test]
    fn test_deep_trace_parses() {
        let entry = parse_nested_trace(&nested_json(300)).unwrap();
        assert_eq!(entry.frame_count(), 301);

        let mut leaf = &entry;
        while let Some(child) = leaf.children.first() {
            leaf = child;
        }
        assert_eq!(leaf.kind, CallKind::StaticCall);
    }

    #[test]
    fn test_deep_error_keeps_path() {
        let json = nested_json(200).replacen("STATICCALL", "JUMP", 1);
        let err = parse_nested_trace(&json).unwrap_err();
        let err = err.downcast::<TraceError>().unwrap();
        assert_eq!(err.path().map(|path| path.depth()), Some(200));
        assert!(matches!(err, TraceError::UnknownCallKind { ref kind, .. } if kind == "JUMP"));
    }
}
