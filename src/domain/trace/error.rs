//! Structural trace errors

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use super::CallKind;

/// Position of a node as child indices from the root
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = Vec::with_capacity(self.0.len() + 1);
        indices.extend_from_slice(&self.0);
        indices.push(index);
        Self(indices)
    }

    /// Path from a stack of child indices kept by a traversal
    pub fn from_indices(indices: &[usize]) -> Self {
        Self(indices.to_vec())
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("root");
        }
        let joined = self
            .0
            .iter()
            .map(|index| index.to_string())
            .collect::<Vec<_>>()
            .join(".");
        f.write_str(&joined)
    }
}

/// The trace producer violated its contract at a specific node
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TraceError {
    #[error("node {path}: unknown call type '{kind}'")]
    UnknownCallKind { path: NodePath, kind: String },
    #[error("node {path}: missing required field '{field}'")]
    MissingField { path: NodePath, field: &'static str },
    #[error("node {path}: {kind} frame has no target address")]
    MissingTarget { path: NodePath, kind: CallKind },
    #[error("node {path}: field '{field}' is not valid hex: {reason}")]
    InvalidHex {
        path: NodePath,
        field: &'static str,
        reason: String,
    },
    #[error("node {path}: invalid address '{value}'")]
    InvalidAddress { path: NodePath, value: String },
    #[error("node {path}: invalid value '{value}'")]
    InvalidValue { path: NodePath, value: String },
    #[error("unsupported trace format: {0}")]
    UnsupportedFormat(String),
}

impl TraceError {
    /// Offending node, if the error is tied to one
    pub fn path(&self) -> Option<&NodePath> {
        match self {
            Self::UnknownCallKind { path, .. }
            | Self::MissingField { path, .. }
            | Self::MissingTarget { path, .. }
            | Self::InvalidHex { path, .. }
            | Self::InvalidAddress { path, .. }
            | Self::InvalidValue { path, .. } => Some(path),
            Self::UnsupportedFormat(_) => None,
        }
    }
}
