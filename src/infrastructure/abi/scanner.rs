//! ABI file scanner - discovers compiled artifacts and builds a signature catalog

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use alloy_json_abi::JsonAbi;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::domain::abi::{SignatureCatalog, SignatureEntry};

/// Artifacts larger than this are skipped
const MAX_ARTIFACT_BYTES: u64 = 5 * 1024 * 1024;

/// Summary of one scan
#[derive(Debug, Default, Clone)]
pub struct ScanReport {
    /// Number of artifact files read
    pub scanned_files: usize,
    /// Number of signatures in the resulting catalog
    pub loaded_functions: usize,
    /// Per-file errors; a bad file never aborts the scan
    pub errors: Vec<String>,
    /// Scan duration in milliseconds
    pub scan_ms: u128,
}

/// ABI file scanner
pub struct AbiScanner;

impl AbiScanner {
    /// Scan a single root directory for ABI files
    pub fn scan(root: impl AsRef<Path>) -> (SignatureCatalog, ScanReport) {
        let started = Instant::now();
        let root = root.as_ref();
        let mut catalog = SignatureCatalog::new();
        let mut report = ScanReport::default();

        for entry in WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| !Self::is_ignored_dir(e.path()))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    report.errors.push(err.to_string());
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();

            // Only JSON files under Foundry out/ or Hardhat artifacts/
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            if !Self::path_contains_any(path, &["out", "artifacts"]) {
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(meta) => meta,
                Err(err) => {
                    report.errors.push(format!("{}: {}", path.display(), err));
                    continue;
                }
            };
            if metadata.len() > MAX_ARTIFACT_BYTES {
                debug!(path = %path.display(), "skipping oversized artifact");
                continue;
            }

            report.scanned_files += 1;

            if let Err(err) = Self::load_abi_file(path, &mut catalog) {
                report.errors.push(format!("{}: {}", path.display(), err));
            }
        }

        report.loaded_functions = catalog.len();
        report.scan_ms = started.elapsed().as_millis();

        (catalog, report)
    }

    /// Scan multiple root directories; earlier roots win selector collisions
    pub fn scan_roots(roots: &[PathBuf]) -> (SignatureCatalog, ScanReport) {
        let started = Instant::now();
        let mut catalog = SignatureCatalog::new();
        let mut report = ScanReport::default();

        for root in roots {
            let (scanned, root_report) = Self::scan(root);
            catalog.merge(scanned);
            report.scanned_files = report.scanned_files.saturating_add(root_report.scanned_files);
            report.errors.extend(root_report.errors);
        }

        report.loaded_functions = catalog.len();
        report.scan_ms = started.elapsed().as_millis();

        info!(
            roots = roots.len(),
            files = report.scanned_files,
            functions = report.loaded_functions,
            errors = report.errors.len(),
            elapsed_ms = report.scan_ms as u64,
            "abi scan finished"
        );

        (catalog, report)
    }

    /// Load a single ABI file
    fn load_abi_file(path: &Path, catalog: &mut SignatureCatalog) -> anyhow::Result<()> {
        let content = fs::read_to_string(path)?;
        let value: serde_json::Value = serde_json::from_str(&content)?;

        // Either a raw ABI array or an artifact with an "abi" field
        let abi_value = if value.is_array() {
            value
        } else if let Some(abi) = value.get("abi") {
            abi.clone()
        } else {
            return Ok(());
        };

        let abi: JsonAbi = serde_json::from_value(abi_value)?;

        for function in abi.functions() {
            catalog.insert(SignatureEntry::from_function(
                function,
                Some(path.to_path_buf()),
            ));
        }

        Ok(())
    }

    /// Check if a path should be ignored
    fn is_ignored_dir(path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(|name| {
                matches!(
                    name,
                    ".git" | "target" | "node_modules" | ".next" | "dist" | "build"
                )
            })
            .unwrap_or(false)
    }

    /// Check if path contains any of the given names
    fn path_contains_any(path: &Path, names: &[&str]) -> bool {
        path.components().any(|component| {
            if let std::path::Component::Normal(value) = component {
                if let Some(value) = value.to_str() {
                    return names.iter().any(|name| *name == value);
                }
            }
            false
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ERC20_ARTIFACT: &str = r#"{
        "abi": [
            {
                "type": "function",
                "name": "transfer",
                "inputs": [
                    {"name": "to", "type": "address"},
                    {"name": "amount", "type": "uint256"}
                ],
                "outputs": [{"name": "", "type": "bool"}],
                "stateMutability": "nonpayable"
            },
            {
                "type": "event",
                "name": "Transfer",
                "inputs": [
                    {"name": "from", "type": "address", "indexed": true},
                    {"name": "to", "type": "address", "indexed": true},
                    {"name": "value", "type": "uint256", "indexed": false}
                ],
                "anonymous": false
            }
        ]
    }"#;

    fn scratch_dir(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("tracelens_scan_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&path);
        path
    }

    #[test]
    fn test_scan_artifacts() {
        let root = scratch_dir("artifacts");
        let out = root.join("out").join("Token.sol");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("Token.json"), ERC20_ARTIFACT).unwrap();
        fs::write(out.join("Broken.json"), "{ not json").unwrap();

        // Outside out/ or artifacts/: ignored
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src").join("Other.json"), ERC20_ARTIFACT).unwrap();

        let (catalog, report) = AbiScanner::scan(&root);

        assert_eq!(report.scanned_files, 2);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(catalog.len(), 1);

        let entry = catalog.lookup_hex("0xa9059cbb").unwrap();
        assert_eq!(entry.name, "transfer");
        assert_eq!(entry.inputs[1].name, "amount");
        assert!(entry.source.is_some());

        fs::remove_dir_all(root).ok();
    }

    #[test]
    fn test_is_ignored_dir() {
        assert!(AbiScanner::is_ignored_dir(Path::new(".git")));
        assert!(AbiScanner::is_ignored_dir(Path::new("node_modules")));
        assert!(!AbiScanner::is_ignored_dir(Path::new("src")));
        assert!(!AbiScanner::is_ignored_dir(Path::new("out")));
    }

    #[test]
    fn test_path_contains_any() {
        assert!(AbiScanner::path_contains_any(
            Path::new("/project/out/Contract.json"),
            &["out", "artifacts"]
        ));
        assert!(AbiScanner::path_contains_any(
            Path::new("/project/artifacts/contracts/Token.json"),
            &["out", "artifacts"]
        ));
        assert!(!AbiScanner::path_contains_any(
            Path::new("/project/src/Contract.sol"),
            &["out", "artifacts"]
        ));
    }
}
