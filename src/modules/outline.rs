//! Text outline of a decoded trace tree

use crate::domain::abi::{DecodeResult, InputDecoder};
use crate::domain::trace::{CallDetail, DecodedTraceNode, NodePayload};

const INDENT: &str = "  ";

/// Render a decoded tree as indented lines, one frame per line
///
/// With `expand` set, call parameters are listed under each call; otherwise
/// calls with parameters show a collapsed `(…)`.
pub fn outline(root: &DecodedTraceNode, decoder: &dyn InputDecoder, expand: bool) -> Vec<String> {
    let mut lines = Vec::new();
    push_node(root, decoder, expand, &mut lines);
    lines
}

fn push_node(
    node: &DecodedTraceNode,
    decoder: &dyn InputDecoder,
    expand: bool,
    lines: &mut Vec<String>,
) {
    let pad = INDENT.repeat(node.path.depth());
    let kind = node.kind.as_str().to_lowercase();
    let target = node
        .target
        .as_ref()
        .map(|unit| unit.text.clone())
        .unwrap_or_else(|| "?".to_string());

    match &node.payload {
        NodePayload::SelfDestruct => lines.push(format!("{pad}{kind} [destroyed] -> {target}")),
        NodePayload::Create { init_code } => {
            lines.push(format!("{pad}{kind} {target} ({} bytes init code)", init_code.len()))
        }
        NodePayload::Call(call) => push_call(call, &pad, &kind, &target, decoder, expand, lines),
    }

    for child in &node.children {
        push_node(child, decoder, expand, lines);
    }
}

fn push_call(
    call: &CallDetail,
    pad: &str,
    kind: &str,
    target: &str,
    decoder: &dyn InputDecoder,
    expand: bool,
    lines: &mut Vec<String>,
) {
    let value = call
        .value
        .map(|value| format!("{{value: {value} wei}}"))
        .unwrap_or_default();
    let head = format!("{pad}{kind} {target}.{}{value}", call.label);

    if !call.has_params {
        lines.push(format!("{head}()"));
        return;
    }
    if !expand {
        lines.push(format!("{head}(…)"));
        return;
    }

    lines.push(format!("{head}("));
    let inner = format!("{pad}{INDENT}{INDENT}");
    match &*call.resolve_input(decoder) {
        DecodeResult::Decoded { params, .. } => {
            for param in params {
                lines.push(format!("{inner}{}: {} = {}", param.name, param.kind, param.value));
            }
        }
        DecodeResult::DecodeFailed { tail, reason, .. } => {
            lines.push(format!("{inner}<undecoded: {reason}>"));
            lines.push(format!("{inner}{tail}"));
        }
        DecodeResult::UnknownSelector { .. } | DecodeResult::NoSelector => {
            lines.push(format!("{inner}{}", call.input));
        }
    }
    lines.push(format!("{pad}{INDENT})"));
}
