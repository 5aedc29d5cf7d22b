//! JSON Export
//!
//! Writes a decoded trace tree to a JSON file.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::domain::abi::{DecodeResult, InputDecoder};
use crate::domain::trace::{DecodedTraceNode, NodePayload};

/// Exportable frame; call inputs are always resolved so the file is
/// self-contained regardless of how the tree was decoded
#[derive(Serialize)]
struct ExportableNode<'a> {
    path: String,
    kind: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_name: Option<&'a str>,
    #[serde(flatten)]
    payload: &'a NodePayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    input_decoded: Option<DecodeResult>,
    children: Vec<ExportableNode<'a>>,
}

impl<'a> ExportableNode<'a> {
    fn build(node: &'a DecodedTraceNode, decoder: &dyn InputDecoder) -> Self {
        let target_name = node
            .target
            .as_ref()
            .filter(|unit| !unit.is_plain())
            .map(|unit| unit.text.as_str());

        Self {
            path: node.path.to_string(),
            kind: node.kind.as_str(),
            target: node.target.as_ref().map(|unit| unit.address.to_checksum(None)),
            target_name,
            payload: &node.payload,
            input_decoded: node
                .call()
                .map(|call| call.resolve_input(decoder).into_owned()),
            children: node
                .children
                .iter()
                .map(|child| ExportableNode::build(child, decoder))
                .collect(),
        }
    }
}

/// Write a decoded tree to a JSON file, returning the number of frames
pub fn write_tree(
    path: &Path,
    root: &DecodedTraceNode,
    decoder: &dyn InputDecoder,
) -> Result<usize> {
    let exportable = ExportableNode::build(root, decoder);
    let json = serde_json::to_string_pretty(&exportable)?;

    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    file.write_all(json.as_bytes())?;

    let mut count = 0;
    root.walk(&mut |_| count += 1);
    Ok(count)
}
