use crate::aggregator::{BlocksPerEntity, Granularity};
use crate::metrics::Metric;
use crate::parser::MetricsReport;
use crate::utils::config::{AppConfig, DataPaths};
use crate::utils::error::ConfigError;
use crate::utils::timeframe::Timeframe;
use chrono::NaiveDate;
use std::path::PathBuf;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Ledgers to analyze
    pub ledgers: Vec<String>,

    /// Days to analyze
    pub timeframe: Timeframe,

    /// Chunk size for counting
    pub granularity: Granularity,

    /// Metrics to compute per chunk
    pub metrics: Vec<Metric>,

    /// Directory holding the identity datasets
    pub mapping_info_dir: PathBuf,

    /// Directory holding `<ledger>_raw_data.json` files
    pub raw_data_dir: PathBuf,

    /// Directory output files are written under, one subdirectory per ledger
    pub output_dir: PathBuf,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl AnalyzeArgs {
    /// Arguments taken entirely from a configuration
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            ledgers: config.default_ledgers.clone(),
            timeframe: config.default_timeframe()?,
            granularity: config.granularity,
            metrics: config.metrics()?,
            mapping_info_dir: config.paths.mapping_info_dir.clone(),
            raw_data_dir: config.paths.raw_data_dir.clone(),
            output_dir: config.paths.output_dir.clone(),
            print_summary: false,
        })
    }
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        let paths = DataPaths::default();
        Self {
            ledgers: vec!["bitcoin".to_string()],
            timeframe: Timeframe {
                start: NaiveDate::MIN,
                end: NaiveDate::MAX,
            },
            granularity: Granularity::All,
            metrics: vec![Metric::Gini, Metric::Hhi],
            mapping_info_dir: paths.mapping_info_dir,
            raw_data_dir: paths.raw_data_dir,
            output_dir: paths.output_dir,
            print_summary: false,
        }
    }
}

/// Outcome of analyzing one ledger
#[derive(Debug, Clone)]
pub struct LedgerReport {
    pub ledger: String,
    pub blocks_per_entity: BlocksPerEntity,
    pub metrics: MetricsReport,
    pub csv_path: PathBuf,
    pub metrics_path: PathBuf,
    pub mapped_data_path: PathBuf,
}
