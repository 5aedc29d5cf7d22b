//! Persistent store for known function signatures

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use std::path::Path;
use tracing::warn;

use crate::domain::abi::{parse_selector, SignatureCatalog, SignatureEntry};

/// SQLite-backed signature store
#[derive(Debug)]
pub struct SignatureStore {
    conn: Connection,
}

impl SignatureStore {
    /// Open or create the store database
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).with_context(|| format!("open db {}", path.display()))?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS selectors (
                selector    TEXT PRIMARY KEY,
                name        TEXT NOT NULL,
                signature   TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    /// Save a signature, replacing any stored one for the selector
    pub fn save_signature(&self, entry: &SignatureEntry) -> Result<()> {
        self.conn.execute(
            "INSERT INTO selectors(selector, name, signature) VALUES (?1, ?2, ?3)
             ON CONFLICT(selector) DO UPDATE SET name=excluded.name, signature=excluded.signature",
            params![entry.selector_hex(), entry.name, entry.signature],
        )?;
        Ok(())
    }

    /// Load every stored signature into a fresh catalog
    ///
    /// Rows whose signature no longer parses are skipped.
    pub fn load_catalog(&self) -> Result<SignatureCatalog> {
        let mut stmt = self
            .conn
            .prepare("SELECT selector, name, signature FROM selectors ORDER BY selector")?;

        let mut rows = stmt.query([])?;
        let mut catalog = SignatureCatalog::new();
        while let Some(row) = rows.next()? {
            let selector: String = row.get(0)?;
            let name: String = row.get(1)?;
            let signature: String = row.get(2)?;
            match entry_from_row(&selector, name, &signature) {
                Ok(entry) => {
                    catalog.insert(entry);
                }
                Err(err) => warn!(
                    selector = %selector,
                    error = %format!("{err:#}"),
                    "skipping stored signature"
                ),
            }
        }
        Ok(catalog)
    }
}

fn entry_from_row(selector: &str, name: String, signature: &str) -> Result<SignatureEntry> {
    let mut entry = SignatureEntry::parse(signature)?;
    let stored = parse_selector(selector)
        .with_context(|| format!("invalid stored selector '{}'", selector))?;
    if stored != entry.selector {
        anyhow::bail!(
            "stored selector {} does not match signature '{}'",
            selector,
            signature
        );
    }
    entry.name = name;
    Ok(entry)
}
