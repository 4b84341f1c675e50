//! Configuration and constants for the CLI.

use super::error::ConfigError;
use super::timeframe::Timeframe;
use crate::aggregator::Granularity;
use crate::metrics::Metric;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Entity name for blocks without any reward signal
pub const UNDEFINED_MINER: &str = "----- UNDEFINED MINER -----";

/// Entity name for blocks whose reward addresses are all special addresses
pub const SPECIAL_ADDRESS: &str = "----- SPECIAL ADDRESS -----";

/// Entity name for Cardano blocks produced by the federated core nodes
pub const CORE_OPERATOR: &str = "[!] IOG (core nodes pre-decentralization)";

/// First cell of the blocks-per-entity CSV header
pub const CSV_HEADER_LABEL: &str = "Entity \\ Time period";

pub const MAPPED_DATA_FILE: &str = "mapped_data.json";
pub const LEGAL_LINKS_FILE: &str = "legal_links.json";
pub const SPECIAL_ADDRESSES_FILE: &str = "special_addresses.json";

/// Link mappings kept by the resolver cache
pub const LINK_CACHE_CAPACITY: usize = 2;

// Field names that may wrap the block array in raw data files
pub const BLOCK_FIELD_NAMES: &[&str] = &["blocks", "data", "result"];

// Metrics whose parameters must agree
pub const METRIC_FAMILIES: &[&[&str]] = &[&["entropy", "entropy_percentage"]];

/// Top-level configuration read from `config.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Ledgers analyzed when none are given on the command line
    pub default_ledgers: Vec<String>,

    pub default_timeframe: DefaultTimeframe,

    pub granularity: Granularity,

    /// Enabled metrics and their parameters
    pub metrics: BTreeMap<String, MetricParams>,

    pub paths: DataPaths,
}

/// Timeframe analyzed when none is given on the command line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultTimeframe {
    pub start_date: String,
    pub end_date: String,
}

/// Parameters of a single metric
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricParams {
    /// Order of the Rényi entropy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
}

/// Data directories
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataPaths {
    pub mapping_info_dir: PathBuf,
    pub raw_data_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        let mut metrics = BTreeMap::new();
        metrics.insert("gini".to_string(), MetricParams::default());
        metrics.insert("hhi".to_string(), MetricParams::default());

        Self {
            default_ledgers: vec![
                "bitcoin".to_string(),
                "cardano".to_string(),
                "tezos".to_string(),
            ],
            default_timeframe: DefaultTimeframe::default(),
            granularity: Granularity::Month,
            metrics,
            paths: DataPaths::default(),
        }
    }
}

impl Default for DefaultTimeframe {
    fn default() -> Self {
        Self {
            start_date: "2018".to_string(),
            end_date: "2023".to_string(),
        }
    }
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            mapping_info_dir: PathBuf::from("mapping_information"),
            raw_data_dir: PathBuf::from("raw_block_data"),
            output_dir: PathBuf::from("output"),
        }
    }
}

impl AppConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.check_metric_families()?;
        Ok(config)
    }

    /// Timeframe covered by `default_timeframe`
    pub fn default_timeframe(&self) -> Result<Timeframe, ConfigError> {
        Ok(Timeframe::between(
            &self.default_timeframe.start_date,
            &self.default_timeframe.end_date,
        )?)
    }

    /// Enabled metrics, in name order
    pub fn metrics(&self) -> Result<Vec<Metric>, ConfigError> {
        self.metrics
            .iter()
            .map(|(name, params)| {
                Metric::from_config(name, params)
                    .ok_or_else(|| ConfigError::UnknownMetric(name.clone()))
            })
            .collect()
    }

    fn check_metric_families(&self) -> Result<(), ConfigError> {
        for family in METRIC_FAMILIES {
            let mut first: Option<(&str, &MetricParams)> = None;
            for name in family.iter() {
                let Some(params) = self.metrics.get(*name) else {
                    continue;
                };
                match first {
                    None => first = Some((*name, params)),
                    Some((first_name, first_params)) if first_params != params => {
                        return Err(ConfigError::InconsistentFamily(
                            first_name.to_string(),
                            name.to_string(),
                        ));
                    }
                    Some(_) => {}
                }
            }
        }
        Ok(())
    }
}

/// Load the configuration file
///
/// A missing file yields the default configuration.
///
/// # Errors
/// * `ConfigError::ReadFailed` - file exists but cannot be read
/// * `ConfigError::ParseFailed` - invalid TOML
/// * `ConfigError::InconsistentFamily` - metric family parameters disagree
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        debug!("No config at {}, using defaults", path.display());
        return Ok(AppConfig::default());
    }

    let contents = fs::read_to_string(path)?;
    AppConfig::from_toml_str(&contents)
}
