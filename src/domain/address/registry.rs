//! Address resolution registry - resolved names by address

use std::collections::HashMap;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// A name produced for an address by one resolver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAddress {
    /// Resolver kind tag (e.g., "ens", "label")
    pub resolver: String,
    /// Resolved display name
    pub name: String,
}

impl ResolvedAddress {
    pub fn new(resolver: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            resolver: resolver.into(),
            name: name.into(),
        }
    }
}

/// Snapshot of resolved addresses
///
/// Holds at most one resolution per address; later inserts replace earlier
/// ones.
#[derive(Debug, Default, Clone)]
pub struct AddressResolutionRegistry {
    resolved: HashMap<Address, ResolvedAddress>,
}

impl AddressResolutionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a resolution, returning the one it replaced
    pub fn insert(
        &mut self,
        address: Address,
        resolver: impl Into<String>,
        name: impl Into<String>,
    ) -> Option<ResolvedAddress> {
        self.resolved
            .insert(address, ResolvedAddress::new(resolver, name))
    }

    pub fn resolve(&self, address: &Address) -> Option<&ResolvedAddress> {
        self.resolved.get(address)
    }

    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }

    /// Fold another resolution pass into this one (other wins on conflict)
    pub fn merge(&mut self, other: Self) {
        self.resolved.extend(other.resolved);
    }
}
