//! Conversion from geth `callTracer` output to trace entries

use alloy::primitives::U256;
use alloy::rpc::types::trace::geth::{CallFrame, GethTrace};
use anyhow::Context;
use serde::Deserialize;

use super::json::from_deep_str;
use crate::domain::trace::{CallKind, NodePath, TraceEntry, TraceError};

/// Convert a geth trace result to a trace tree
pub fn convert_geth_trace(trace: GethTrace) -> Result<TraceEntry, TraceError> {
    match trace {
        GethTrace::CallTracer(call) => convert_call_frame(&call),
        _ => Err(TraceError::UnsupportedFormat(
            "only callTracer output can be decoded".to_string(),
        )),
    }
}

/// Convert a root call frame and all its sub-calls
pub fn convert_call_frame(frame: &CallFrame) -> Result<TraceEntry, TraceError> {
    convert_frame(frame, &mut Vec::new())
}

/// JSON-RPC response carrying a callTracer frame
#[derive(Deserialize)]
struct RpcEnvelope {
    result: CallFrame,
}

/// Parse a `callTracer` JSON document of any depth, bare or wrapped in a
/// JSON-RPC `result`
pub fn parse_geth_trace(json: &str) -> anyhow::Result<TraceEntry> {
    let frame = match from_deep_str::<CallFrame>(json) {
        Ok(frame) => frame,
        Err(bare_err) => match from_deep_str::<RpcEnvelope>(json) {
            Ok(envelope) => envelope.result,
            Err(_) => return Err(bare_err).context("Not a callTracer frame"),
        },
    };
    Ok(convert_call_frame(&frame)?)
}

fn convert_frame(frame: &CallFrame, indices: &mut Vec<usize>) -> Result<TraceEntry, TraceError> {
    let kind = frame
        .typ
        .parse::<CallKind>()
        .map_err(|err| TraceError::UnknownCallKind {
            path: NodePath::from_indices(indices),
            kind: err.0,
        })?;

    let mut children = Vec::with_capacity(frame.calls.len());
    for (index, child) in frame.calls.iter().enumerate() {
        indices.push(index);
        let converted = convert_frame(child, indices);
        indices.pop();
        children.push(converted?);
    }

    Ok(TraceEntry {
        kind,
        target: frame.to,
        input: frame.input.clone(),
        value: frame.value.unwrap_or(U256::ZERO),
        children,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CALL_TRACER_JSON: &str = r#"{
        "from": "0x1111111111111111111111111111111111111111",
        "gas": "0x5208",
        "gasUsed": "0x5208",
        "to": "0x2222222222222222222222222222222222222222",
        "input": "0xa9059cbb00000000000000000000000033333333333333333333333333333333333333330000000000000000000000000000000000000000000000000000000000000001",
        "value": "0x0",
        "type": "CALL",
        "calls": [
            {
                "from": "0x2222222222222222222222222222222222222222",
                "gas": "0x100",
                "gasUsed": "0x10",
                "to": "0x4444444444444444444444444444444444444444",
                "input": "0x",
                "value": "0xde0b6b3a7640000",
                "type": "CALL"
            },
            {
                "from": "0x2222222222222222222222222222222222222222",
                "gas": "0x100",
                "gasUsed": "0x10",
                "to": "0x5555555555555555555555555555555555555555",
                "input": "0x",
                "type": "SELFDESTRUCT"
            }
        ]
    }"#;

    #[test]
    fn test_convert_call_frame() {
        let frame: CallFrame = serde_json::from_str(CALL_TRACER_JSON).unwrap();
        let entry = convert_call_frame(&frame).unwrap();

        assert_eq!(entry.kind, CallKind::Call);
        assert_eq!(entry.input.len(), 68);
        assert_eq!(entry.children.len(), 2);
        assert_eq!(
            entry.children[0].value,
            U256::from(1_000_000_000_000_000_000u64)
        );
        assert_eq!(entry.children[1].kind, CallKind::SelfDestruct);
        assert_eq!(entry.children[1].value, U256::ZERO);
    }

    #[test]
    fn test_unknown_call_type_names_node() {
        let mut frame: CallFrame = serde_json::from_str(CALL_TRACER_JSON).unwrap();
        frame.calls[1].typ = "JUMPDEST".to_string();

        let err = convert_call_frame(&frame).unwrap_err();
        assert_eq!(
            err,
            TraceError::UnknownCallKind {
                path: NodePath::root().child(1),
                kind: "JUMPDEST".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_wrapped_response() {
        let wrapped = format!(r#"{{"jsonrpc":"2.0","id":1,"result":{}}}"#, CALL_TRACER_JSON);
        let entry = parse_geth_trace(&wrapped).unwrap();
        assert_eq!(entry.frame_count(), 3);

        let bare = parse_geth_trace(CALL_TRACER_JSON).unwrap();
        assert_eq!(bare, entry);
    }

    #[test]
    fn test_geth_trace_requires_call_tracer() {
        let frame: CallFrame = serde_json::from_str(CALL_TRACER_JSON).unwrap();
        assert!(convert_geth_trace(GethTrace::CallTracer(frame)).is_ok());
        assert!(matches!(
            convert_geth_trace(GethTrace::JS(serde_json::Value::Null)),
            Err(TraceError::UnsupportedFormat(_))
        ));
    }

    fn deep_call_tracer(depth: usize) -> String {
        let frame = r#"{"from": "0x1111111111111111111111111111111111111111", "gas": "0x0", "gasUsed": "0x0", "to": "0x2222222222222222222222222222222222222222", "input": "0x", "type": "CALL", "calls": ["#;
        let leaf = r#"{"from": "0x1111111111111111111111111111111111111111", "gas": "0x0", "gasUsed": "0x0", "to": "0x2222222222222222222222222222222222222222", "input": "0x", "type": "DELEGATECALL"}"#;
        format!("{}{}{}", frame.repeat(depth), leaf, "]}".repeat(depth))
    }

    #[test]
    fn test_deep_call_tracer() {
        let json = deep_call_tracer(250);
        let entry = parse_geth_trace(&json).unwrap();
        assert_eq!(entry.frame_count(), 251);

        let wrapped = format!(r#"{{"jsonrpc":"2.0","id":7,"result":{}}}"#, json);
        assert_eq!(parse_geth_trace(&wrapped).unwrap(), entry);
    }

    #[test]
    fn test_not_a_frame() {
        assert!(parse_geth_trace(r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32000}}"#).is_err());
    }
}
