//! Export Module
//!
//! Writes decoded trace trees to disk.
//!
//! - JSON keeps the full tree, including decoded parameters
//! - CSV flattens the tree to one row per frame
//! - Filenames are timestamped so repeated exports never collide

mod csv_export;
mod json_export;

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::info;

use crate::domain::abi::InputDecoder;
use crate::domain::trace::DecodedTraceNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(format!("unknown export format: {other}")),
        }
    }
}

/// Generate a timestamped filename
pub fn generate_filename(prefix: &str, extension: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d-%H%M%S");
    format!("{}-{}.{}", prefix, timestamp, extension)
}

/// Export one decoded tree into `dir`, creating it if needed
///
/// Returns the path written.
pub fn export_trace(
    dir: &Path,
    prefix: &str,
    root: &DecodedTraceNode,
    decoder: &dyn InputDecoder,
    format: ExportFormat,
) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;

    let path = dir.join(generate_filename(prefix, format.extension()));
    let count = match format {
        ExportFormat::Json => json_export::write_tree(&path, root, decoder)?,
        ExportFormat::Csv => csv_export::write_tree(&path, root, decoder)?,
    };

    info!(path = %path.display(), frames = count, "exported trace");
    Ok(path)
}
