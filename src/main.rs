use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use alloy_primitives::Address;
use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tracelens::config::{self, Config};
use tracelens::domain::abi::SignatureEntry;
use tracelens::domain::address::LABEL_RESOLVER;
use tracelens::domain::LookupTables;
use tracelens::infrastructure::ethereum::{parse_geth_trace, parse_nested_trace};
use tracelens::infrastructure::{AbiScanner, AlloyInputDecoder};
use tracelens::modules::export::{export_trace, ExportFormat};
use tracelens::modules::outline::outline;
use tracelens::store::{ResolutionStore, SignatureStore};
use tracelens::{DecodedTraceNode, RendererRegistry, TraceEntry, TraceNodeDecoder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TraceFormat {
    /// Nested JSON with `type`, `to`, `input`, `value`, `children`
    Nested,
    /// geth `debug_traceTransaction` callTracer output
    Geth,
}

#[derive(Debug, Parser)]
#[command(
    name = "tracelens",
    version,
    about = "Decode EVM call traces into readable call trees"
)]
struct Args {
    /// Trace files to decode
    #[arg(required = true)]
    traces: Vec<PathBuf>,

    #[arg(long, value_enum, default_value_t = TraceFormat::Nested)]
    format: TraceFormat,

    /// Extra directory to scan for ABI artifacts (repeatable)
    #[arg(long = "abi")]
    abi_paths: Vec<PathBuf>,

    /// Extra function signature, e.g. "transfer(address,uint256)" (repeatable)
    #[arg(long = "signature")]
    signatures: Vec<String>,

    /// Address being viewed; rendered as non-linkable
    #[arg(long)]
    selected: Option<Address>,

    /// Decode and list call parameters
    #[arg(long)]
    expand: bool,

    /// Print the decoded tree as JSON instead of an outline
    #[arg(long)]
    json: bool,

    /// Write each decoded tree to this directory
    #[arg(long)]
    export: Option<PathBuf>,

    #[arg(long, default_value = "json")]
    export_format: ExportFormat,

    /// Name an address as ADDRESS=NAME; remembered in the resolution store (repeatable)
    #[arg(long = "label", value_parser = parse_label)]
    labels: Vec<(Address, String)>,

    /// Remove an address from the resolution store (repeatable)
    #[arg(long = "forget")]
    forget: Vec<Address>,

    /// Skip the on-disk signature and resolution stores
    #[arg(long)]
    no_store: bool,
}

fn parse_label(value: &str) -> Result<(Address, String), String> {
    let (address, name) = value
        .split_once('=')
        .ok_or_else(|| format!("expected ADDRESS=NAME, got '{value}'"))?;
    let address = address
        .trim()
        .parse::<Address>()
        .map_err(|err| format!("invalid address '{}': {err}", address.trim()))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty name for {address}"));
    }
    Ok((address, name.to_string()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = config::load();

    let tables = Arc::new(load_tables(&args, &config)?);
    let selected = args.selected.or_else(|| config.selected());
    let expand = args.expand || config.expand_params;
    let dont_override_colors = config.dont_override_colors;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start runtime")?;

    let results = runtime.block_on(async {
        let tasks = args.traces.iter().cloned().map(|path| {
            let tables = Arc::clone(&tables);
            let format = args.format;
            tokio::task::spawn_blocking(move || {
                let decoded =
                    decode_file(&path, format, &tables, selected, expand, dont_override_colors);
                (path, decoded)
            })
        });
        futures::future::join_all(tasks).await
    });

    let decoder = AlloyInputDecoder::new();
    let mut failures = 0usize;

    for joined in results {
        let (path, decoded) = joined.map_err(|err| anyhow!("decode task panicked: {err}"))?;
        let root = match decoded {
            Ok(root) => root,
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %format!("{err:#}"),
                    "failed to decode trace"
                );
                failures += 1;
                continue;
            }
        };

        if args.traces.len() > 1 {
            println!("# {}", path.display());
        }
        if args.json {
            println!("{}", serde_json::to_string_pretty(&root)?);
        } else {
            for line in outline(&root, &decoder, expand) {
                println!("{line}");
            }
        }

        if let Some(dir) = &args.export {
            let prefix = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or("trace");
            export_trace(dir, prefix, &root, &decoder, args.export_format)?;
        }
    }

    if failures > 0 {
        return Err(anyhow!("{failures} of {} traces failed to decode", args.traces.len()));
    }
    Ok(())
}

/// Build the lookup tables once; decoding passes only read them
///
/// Signatures: ABI artifacts, then configured and CLI signatures, then the
/// store. Earlier sources win selector collisions. Addresses: stored
/// resolutions, overridden by configured then `--label` names.
fn load_tables(args: &Args, config: &Config) -> Result<LookupTables> {
    let mut tables = LookupTables::default();

    let mut roots = config.abi_roots();
    roots.extend(args.abi_paths.iter().cloned());
    if !roots.is_empty() {
        let (catalog, report) = AbiScanner::scan_roots(&roots);
        for error in &report.errors {
            warn!(error = %error, "abi artifact skipped");
        }
        tables.signatures.merge(catalog);
    }

    tables.signatures.merge(config.signature_catalog());
    for text in &args.signatures {
        let entry = SignatureEntry::parse(text)
            .with_context(|| format!("Invalid --signature '{text}'"))?;
        tables.signatures.insert(entry);
    }

    tables.addresses = config.label_registry();
    for (address, name) in &args.labels {
        tables.addresses.insert(*address, LABEL_RESOLVER, name.clone());
    }

    if !args.no_store {
        merge_stores(&mut tables, args);
    }

    info!(
        signatures = tables.signatures.len(),
        addresses = tables.addresses.len(),
        "lookup tables ready"
    );
    Ok(tables)
}

/// Merge the on-disk stores, remembering newly learned signatures and
/// applying `--label`/`--forget`
///
/// Store failures are logged and never stop decoding.
fn merge_stores(tables: &mut LookupTables, args: &Args) {
    let Some(data_dir) = config::data_dir() else {
        return;
    };
    if let Err(err) = fs::create_dir_all(&data_dir) {
        warn!(path = %data_dir.display(), error = %err, "data directory unavailable");
        return;
    }

    if let Some(path) = config::signatures_db_path() {
        let merged = SignatureStore::open(&path).and_then(|store| {
            for entry in tables.signatures.entries() {
                store.save_signature(entry)?;
            }
            store.load_catalog()
        });
        match merged {
            Ok(stored) => tables.signatures.merge(stored),
            Err(err) => warn!(error = %format!("{err:#}"), "signature store unavailable"),
        }
    }

    if let Some(path) = config::resolutions_db_path() {
        let loaded = ResolutionStore::open(&path).and_then(|store| {
            for address in &args.forget {
                store.remove_resolution(*address)?;
            }
            for (address, name) in &args.labels {
                store.set_resolution(*address, LABEL_RESOLVER, name)?;
            }
            store.load_registry()
        });
        match loaded {
            Ok(mut stored) => {
                stored.merge(std::mem::take(&mut tables.addresses));
                tables.addresses = stored;
            }
            Err(err) => warn!(error = %format!("{err:#}"), "resolution store unavailable"),
        }
    }
}

fn decode_file(
    path: &Path,
    format: TraceFormat,
    tables: &LookupTables,
    selected: Option<Address>,
    expand: bool,
    dont_override_colors: bool,
) -> Result<DecodedTraceNode> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let entry: TraceEntry = match format {
        TraceFormat::Nested => parse_nested_trace(&content)?,
        TraceFormat::Geth => parse_geth_trace(&content)?,
    };

    let input_decoder = AlloyInputDecoder::new();
    let decoded = TraceNodeDecoder::new(
        &tables.signatures,
        &input_decoder,
        &tables.addresses,
        RendererRegistry::defaults(),
    )
    .with_selected(selected)
    .with_dont_override_colors(dont_override_colors)
    .with_expanded_params(expand)
    .decode(&entry)?;

    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_label() {
        let (address, name) =
            parse_label(" 0x2222222222222222222222222222222222222222 = Router ").unwrap();
        assert_eq!(address, Address::repeat_byte(0x22));
        assert_eq!(name, "Router");

        assert!(parse_label("0x2222222222222222222222222222222222222222").is_err());
        assert!(parse_label("0x2222222222222222222222222222222222222222=").is_err());
        assert!(parse_label("router=Router").is_err());
    }
}
