//! CSV Export
//!
//! Flattens a decoded trace tree to one row per frame, in execution order.

use std::path::Path;

use anyhow::Result;

use crate::domain::abi::{DecodeResult, InputDecoder};
use crate::domain::trace::{DecodedTraceNode, NodePayload};

const HEADER: [&str; 10] = [
    "path",
    "depth",
    "kind",
    "target",
    "target_name",
    "label",
    "value",
    "signature",
    "status",
    "params",
];

/// Write a decoded tree to a CSV file, returning the number of rows
pub fn write_tree(
    path: &Path,
    root: &DecodedTraceNode,
    decoder: &dyn InputDecoder,
) -> Result<usize> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(HEADER)?;

    let mut rows = Vec::new();
    root.walk(&mut |node| rows.push(row(node, decoder)));

    for record in &rows {
        wtr.write_record(record)?;
    }

    wtr.flush()?;
    Ok(rows.len())
}

fn row(node: &DecodedTraceNode, decoder: &dyn InputDecoder) -> [String; 10] {
    let target = node
        .target
        .as_ref()
        .map(|unit| unit.address.to_checksum(None))
        .unwrap_or_default();
    let target_name = node
        .target
        .as_ref()
        .filter(|unit| !unit.is_plain())
        .map(|unit| unit.text.clone())
        .unwrap_or_default();

    let (label, value, signature, status, params) = match &node.payload {
        NodePayload::Call(call) => {
            let result = call.resolve_input(decoder);
            let params = result
                .params()
                .iter()
                .map(|param| format!("{}={}", param.name, param.value))
                .collect::<Vec<_>>()
                .join("; ");
            (
                call.label.clone(),
                call.value.map(|value| value.to_string()).unwrap_or_default(),
                call.signature
                    .as_ref()
                    .map(|entry| entry.signature.clone())
                    .unwrap_or_default(),
                status_label(&result).to_string(),
                params,
            )
        }
        NodePayload::Create { init_code } => (
            String::new(),
            String::new(),
            String::new(),
            format!("{} bytes", init_code.len()),
            String::new(),
        ),
        NodePayload::SelfDestruct => (
            String::new(),
            String::new(),
            String::new(),
            "destroyed".to_string(),
            String::new(),
        ),
    };

    [
        node.path.to_string(),
        node.path.depth().to_string(),
        node.kind.to_string(),
        target,
        target_name,
        label,
        value,
        signature,
        status,
        params,
    ]
}

fn status_label(result: &DecodeResult) -> &'static str {
    match result {
        DecodeResult::NoSelector => "no_selector",
        DecodeResult::UnknownSelector { .. } => "unknown_selector",
        DecodeResult::DecodeFailed { .. } => "decode_failed",
        DecodeResult::Decoded { .. } => "decoded",
    }
}
