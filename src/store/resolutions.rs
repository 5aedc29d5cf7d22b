//! Persistent store for resolved address names

use std::path::Path;

use alloy_primitives::Address;
use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use tracing::warn;

use crate::domain::address::AddressResolutionRegistry;

/// Resolved address names, one row per address
#[derive(Debug)]
pub struct ResolutionStore {
    conn: Connection,
}

impl ResolutionStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).with_context(|| format!("open db {}", path.display()))?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    /// Load every stored resolution into a fresh snapshot
    pub fn load_registry(&self) -> Result<AddressResolutionRegistry> {
        let mut stmt = self
            .conn
            .prepare("SELECT address, resolver, name FROM resolutions ORDER BY address")?;
        let mut rows = stmt.query([])?;
        let mut registry = AddressResolutionRegistry::new();
        while let Some(row) = rows.next()? {
            let address: String = row.get(0)?;
            let resolver: String = row.get(1)?;
            let name: String = row.get(2)?;
            match address.parse::<Address>() {
                Ok(address) => {
                    registry.insert(address, resolver, name);
                }
                Err(err) => warn!(address = %address, error = %err, "skipping stored resolution"),
            }
        }
        Ok(registry)
    }

    pub fn set_resolution(&self, address: Address, resolver: &str, name: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO resolutions(address, resolver, name) VALUES (?1, ?2, ?3)
             ON CONFLICT(address) DO UPDATE SET resolver=excluded.resolver, name=excluded.name",
            params![address_key(address), resolver, name],
        )?;
        Ok(())
    }

    pub fn remove_resolution(&self, address: Address) -> Result<()> {
        self.conn.execute(
            "DELETE FROM resolutions WHERE address = ?1",
            params![address_key(address)],
        )?;
        Ok(())
    }

    fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS resolutions (
                address  TEXT PRIMARY KEY,
                resolver TEXT NOT NULL,
                name     TEXT NOT NULL
            );",
        )?;
        Ok(())
    }
}

fn address_key(address: Address) -> String {
    format!("0x{}", hex::encode(address))
}
