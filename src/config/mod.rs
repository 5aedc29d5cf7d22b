use std::fs;
use std::path::PathBuf;

use alloy_primitives::Address;
use serde::Deserialize;
use tracing::warn;

use crate::domain::abi::{SignatureCatalog, SignatureEntry};
use crate::domain::address::{AddressResolutionRegistry, LABEL_RESOLVER};

#[derive(Debug, Clone, Deserialize)]
pub struct LabelSpec {
    pub address: String,
    pub name: String,
    /// Resolver kind to file the label under, defaults to "label"
    pub resolver: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub abi_paths: Vec<String>,

    /// Extra text signatures, e.g. "transfer(address,uint256)"
    #[serde(default)]
    pub signatures: Vec<String>,

    #[serde(default)]
    pub labels: Vec<LabelSpec>,

    pub selected_address: Option<String>,

    #[serde(default)]
    pub expand_params: bool,

    #[serde(default)]
    pub dont_override_colors: bool,
}

impl Config {
    pub fn abi_roots(&self) -> Vec<PathBuf> {
        self.abi_paths.iter().map(|path| expand_home(path)).collect()
    }

    /// Catalog of the configured text signatures; unparseable ones are skipped
    pub fn signature_catalog(&self) -> SignatureCatalog {
        self.signatures
            .iter()
            .filter_map(|text| match SignatureEntry::parse(text) {
                Ok(entry) => Some(entry),
                Err(err) => {
                    warn!(
                        signature = %text,
                        error = %format!("{err:#}"),
                        "ignoring configured signature"
                    );
                    None
                }
            })
            .collect()
    }

    /// Resolutions for the configured labels; bad addresses are skipped
    pub fn label_registry(&self) -> AddressResolutionRegistry {
        let mut registry = AddressResolutionRegistry::new();
        for label in &self.labels {
            match normalize_address(&label.address).parse::<Address>() {
                Ok(address) => {
                    let resolver = label
                        .resolver
                        .clone()
                        .filter(|s| !s.trim().is_empty())
                        .unwrap_or_else(|| LABEL_RESOLVER.to_string());
                    registry.insert(address, resolver, label.name.clone());
                }
                Err(err) => {
                    warn!(address = %label.address, error = %err, "ignoring configured label")
                }
            }
        }
        registry
    }

    pub fn selected(&self) -> Option<Address> {
        self.selected_address
            .as_deref()
            .and_then(|value| normalize_address(value).parse().ok())
    }
}

pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(_) => return Config::default(),
    };
    parse(&content).unwrap_or_else(|err| {
        warn!(path = %path.display(), error = %err, "invalid config, using defaults");
        Config::default()
    })
}

pub fn parse(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(content)
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("TRACELENS_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("tracelens").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("tracelens").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "tracelens", "tracelens")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn data_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").map(PathBuf::from) {
        return Some(xdg.join("tracelens"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".local").join("share").join("tracelens"));
    }
    directories::ProjectDirs::from("io", "tracelens", "tracelens")
        .map(|dirs| dirs.data_dir().to_path_buf())
}

pub fn signatures_db_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("signatures.sqlite3"))
}

pub fn resolutions_db_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("resolutions.sqlite3"))
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(path)
}

fn normalize_address(address: &str) -> String {
    let trimmed = address.trim();
    let payload = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    format!("0x{}", payload.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        abi_paths = ["./contracts", "/opt/abis"]
        signatures = ["transfer(address,uint256)", "broken("]
        selected_address = "0X1111111111111111111111111111111111111111"
        expand_params = true

        [[labels]]
        address = "0x2222222222222222222222222222222222222222"
        name = "Router"

        [[labels]]
        address = "0x3333333333333333333333333333333333333333"
        name = "vitalik.eth"
        resolver = "ens"

        [[labels]]
        address = "nope"
        name = "Ignored"
    "#;

    #[test]
    fn test_parse_config() {
        let config = parse(SAMPLE).unwrap();
        assert_eq!(config.abi_roots().len(), 2);
        assert!(config.expand_params);
        assert!(!config.dont_override_colors);
        assert_eq!(config.selected(), Some(Address::repeat_byte(0x11)));
    }

    #[test]
    fn test_config_tables() {
        let config = parse(SAMPLE).unwrap();

        let catalog = config.signature_catalog();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.lookup_hex("0xa9059cbb").is_some());

        let labels = config.label_registry();
        assert_eq!(labels.len(), 2);
        assert_eq!(
            labels.resolve(&Address::repeat_byte(0x22)).unwrap().resolver,
            LABEL_RESOLVER
        );
        assert_eq!(
            labels.resolve(&Address::repeat_byte(0x33)).unwrap().resolver,
            "ens"
        );
    }

    #[test]
    fn test_empty_config() {
        let config = parse("").unwrap();
        assert!(config.abi_paths.is_empty());
        assert!(config.selected().is_none());
        assert!(!config.expand_params);
    }
}
