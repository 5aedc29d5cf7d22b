//! Signature catalog - stores function signatures by selector

use std::collections::HashMap;
use std::path::PathBuf;

use alloy_json_abi::Function;
use alloy_primitives::Selector;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::selector::{parse_selector, selector_hex};

/// A function parameter specification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Parameter name (may be empty)
    pub name: String,
    /// Solidity type (e.g., "address", "uint256", "(uint256,address)")
    pub kind: String,
}

/// A known function signature for one selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureEntry {
    /// 4-byte function selector
    pub selector: Selector,
    /// Function name
    pub name: String,
    /// Full signature string (e.g., "transfer(address,uint256)")
    pub signature: String,
    /// Input parameters
    pub inputs: Vec<ParamSpec>,
    /// Artifact file this signature was loaded from, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
}

impl SignatureEntry {
    /// Build an entry from a parsed JSON ABI function
    pub fn from_function(function: &Function, source: Option<PathBuf>) -> Self {
        let inputs = function
            .inputs
            .iter()
            .map(|input| ParamSpec {
                name: input.name.clone(),
                kind: input.selector_type().into_owned(),
            })
            .collect();

        Self {
            selector: function.selector(),
            name: function.name.clone(),
            signature: function.signature(),
            inputs,
            source,
        }
    }

    /// Parse a textual signature such as `transfer(address,uint256)`
    ///
    /// Human-readable forms with parameter names and a `function` keyword are
    /// accepted too.
    pub fn parse(text: &str) -> Result<Self> {
        let function = Function::parse(text.trim())
            .with_context(|| format!("invalid function signature '{}'", text.trim()))?;
        Ok(Self::from_function(&function, None))
    }

    /// Get selector as hex string
    pub fn selector_hex(&self) -> String {
        selector_hex(self.selector)
    }
}

/// Read-only lookup of function signatures indexed by selector
///
/// Holds exactly one entry per selector. Collisions are settled on insert:
/// the first entry for a selector wins.
#[derive(Debug, Default, Clone)]
pub struct SignatureCatalog {
    functions: HashMap<Selector, SignatureEntry>,
}

impl SignatureCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a signature, returning `false` if the selector was already taken
    pub fn insert(&mut self, entry: SignatureEntry) -> bool {
        match self.functions.entry(entry.selector) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(entry);
                true
            }
        }
    }

    /// Look up a signature by selector
    pub fn lookup(&self, selector: Selector) -> Option<&SignatureEntry> {
        self.functions.get(&selector)
    }

    /// Look up a signature by selector hex string (e.g., "0xa9059cbb")
    pub fn lookup_hex(&self, selector_hex: &str) -> Option<&SignatureEntry> {
        parse_selector(selector_hex).and_then(|selector| self.lookup(selector))
    }

    /// Get the number of registered signatures
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Merge another catalog into this one
    ///
    /// Entries from the other catalog are only added if their
    /// selector is not already present (first wins).
    pub fn merge(&mut self, other: Self) {
        for (selector, entry) in other.functions {
            self.functions.entry(selector).or_insert(entry);
        }
    }

    /// Get all signatures
    pub fn entries(&self) -> impl Iterator<Item = &SignatureEntry> {
        self.functions.values()
    }
}

impl FromIterator<SignatureEntry> for SignatureCatalog {
    fn from_iter<I: IntoIterator<Item = SignatureEntry>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for entry in iter {
            catalog.insert(entry);
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_insert_lookup() {
        let mut catalog = SignatureCatalog::new();
        let entry = SignatureEntry::parse("transfer(address to, uint256 amount)").unwrap();

        assert_eq!(entry.selector_hex(), "0xa9059cbb");
        assert_eq!(entry.signature, "transfer(address,uint256)");
        assert_eq!(entry.inputs[0].name, "to");
        assert_eq!(entry.inputs[1].kind, "uint256");

        assert!(catalog.insert(entry));
        assert_eq!(catalog.len(), 1);
        assert!(catalog.lookup_hex("0xa9059cbb").is_some());
        assert!(catalog.lookup_hex("0xdeadbeef").is_none());
    }

    #[test]
    fn test_first_wins() {
        let mut catalog = SignatureCatalog::new();

        let first = SignatureEntry::parse("transfer(address,uint256)").unwrap();
        let mut second = first.clone();
        second.name = "transferV2".to_string();
        second.source = Some(PathBuf::from("second.json"));

        assert!(catalog.insert(first));
        assert!(!catalog.insert(second));

        assert_eq!(catalog.len(), 1);
        let found = catalog.lookup_hex("0xa9059cbb").unwrap();
        assert_eq!(found.name, "transfer");
    }

    #[test]
    fn test_merge_keeps_existing() {
        let mut base: SignatureCatalog =
            [SignatureEntry::parse("deposit()").unwrap()].into_iter().collect();

        let mut renamed = SignatureEntry::parse("deposit()").unwrap();
        renamed.name = "shadowed".to_string();
        let other: SignatureCatalog = [
            renamed,
            SignatureEntry::parse("withdraw(uint256)").unwrap(),
        ]
        .into_iter()
        .collect();

        base.merge(other);
        assert_eq!(base.len(), 2);
        assert_eq!(base.lookup_hex("0xd0e30db0").unwrap().name, "deposit");
        assert!(base.lookup_hex("0x2e1a7d4d").is_some());
    }

    #[test]
    fn test_parse_tuple_signature() {
        let entry = SignatureEntry::parse("submit((uint256,address),bytes)").unwrap();
        assert_eq!(entry.inputs.len(), 2);
        assert_eq!(entry.inputs[0].kind, "(uint256,address)");
        assert_eq!(entry.inputs[1].kind, "bytes");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(SignatureEntry::parse("not a signature(").is_err());
    }
}
