//! Raw trace entries as produced by transaction replay

use std::fmt;
use std::str::FromStr;

use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// Opcode that opened a call frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallKind {
    #[serde(rename = "CALL")]
    Call,
    #[serde(rename = "CALLCODE")]
    CallCode,
    #[serde(rename = "DELEGATECALL")]
    DelegateCall,
    #[serde(rename = "STATICCALL")]
    StaticCall,
    #[serde(rename = "CREATE")]
    Create,
    #[serde(rename = "CREATE2")]
    Create2,
    #[serde(rename = "SELFDESTRUCT")]
    SelfDestruct,
}

impl CallKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Call => "CALL",
            Self::CallCode => "CALLCODE",
            Self::DelegateCall => "DELEGATECALL",
            Self::StaticCall => "STATICCALL",
            Self::Create => "CREATE",
            Self::Create2 => "CREATE2",
            Self::SelfDestruct => "SELFDESTRUCT",
        }
    }
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown call type '{0}'")]
pub struct ParseCallKindError(pub String);

impl FromStr for CallKind {
    type Err = ParseCallKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CALL" => Ok(Self::Call),
            "CALLCODE" => Ok(Self::CallCode),
            "DELEGATECALL" => Ok(Self::DelegateCall),
            "STATICCALL" => Ok(Self::StaticCall),
            "CREATE" => Ok(Self::Create),
            "CREATE2" => Ok(Self::Create2),
            "SELFDESTRUCT" => Ok(Self::SelfDestruct),
            _ => Err(ParseCallKindError(s.to_string())),
        }
    }
}

/// One recorded call frame and its sub-calls in execution order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEntry {
    pub kind: CallKind,
    /// Callee, created contract, or self-destruct beneficiary
    pub target: Option<Address>,
    pub input: Bytes,
    pub value: U256,
    pub children: Vec<TraceEntry>,
}

impl TraceEntry {
    pub fn new(kind: CallKind, target: Option<Address>, input: impl Into<Bytes>) -> Self {
        Self {
            kind,
            target,
            input: input.into(),
            value: U256::ZERO,
            children: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    pub fn with_child(mut self, child: TraceEntry) -> Self {
        self.children.push(child);
        self
    }

    /// Number of frames in this subtree, including this one
    pub fn frame_count(&self) -> usize {
        1 + self.children.iter().map(TraceEntry::frame_count).sum::<usize>()
    }
}
