//! Consensus Decentralization CLI
//!
//! Attributes blocks to the entities that produced them and computes
//! concentration metrics per time chunk.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::info;
use std::path::PathBuf;

use consensus_decentralization::aggregator::Granularity;
use consensus_decentralization::commands::{
    compute_metrics_file, display_version, execute_analyze, validate_args, validate_counts_file,
    AnalyzeArgs,
};
use consensus_decentralization::utils::config::{load_config, AppConfig};
use consensus_decentralization::utils::timeframe::{valid_timeframe, Timeframe};

/// Consensus Decentralization - who produces the blocks
#[derive(Parser, Debug)]
#[command(name = "consensus-decentralization")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Attribute blocks to entities and compute metrics
    Analyze {
        /// Ledgers to analyze (defaults to the configured ledgers)
        #[arg(short, long, num_args = 1..)]
        ledgers: Vec<String>,

        /// First timeframe to analyze, YYYY-MM-DD (day and month can be omitted)
        #[arg(long, value_parser = timeframe_arg)]
        start: Option<String>,

        /// Last timeframe to analyze, YYYY-MM-DD (day and month can be omitted)
        #[arg(long, value_parser = timeframe_arg)]
        end: Option<String>,

        /// Size of the time chunks
        #[arg(short, long, value_enum)]
        granularity: Option<Granularity>,

        /// Path to the configuration file
        #[arg(short, long, default_value = "config.toml", env = "CONSENSUS_CONFIG")]
        config: PathBuf,

        /// Directory with identity data (overrides config)
        #[arg(long)]
        mapping_info: Option<PathBuf>,

        /// Directory with raw block data (overrides config)
        #[arg(long)]
        raw_data: Option<PathBuf>,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Compute metrics from a blocks-per-entity CSV file
    Metrics {
        /// Path to the CSV file
        #[arg(short, long)]
        file: PathBuf,

        /// Path to the configuration file
        #[arg(short, long, default_value = "config.toml", env = "CONSENSUS_CONFIG")]
        config: PathBuf,
    },

    /// Validate a blocks-per-entity CSV file
    Validate {
        /// Path to the CSV file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Analyze {
            ledgers,
            start,
            end,
            granularity,
            config,
            mapping_info,
            raw_data,
            output,
            summary,
        } => {
            let config = load_config(&config)
                .with_context(|| format!("Failed to load config {}", config.display()))?;

            let mut args = AnalyzeArgs::from_config(&config)?;
            if !ledgers.is_empty() {
                args.ledgers = ledgers;
            }
            args.timeframe = resolve_timeframe(&config, start, end)?;
            if let Some(granularity) = granularity {
                args.granularity = granularity;
            }
            if let Some(dir) = mapping_info {
                args.mapping_info_dir = dir;
            }
            if let Some(dir) = raw_data {
                args.raw_data_dir = dir;
            }
            if let Some(dir) = output {
                args.output_dir = dir;
            }
            args.print_summary = summary;

            // Validate args first
            validate_args(&args)?;

            let reports = execute_analyze(args)?;
            info!("Analyzed {} ledger(s)", reports.len());
        }

        Commands::Metrics { file, config } => {
            let config = load_config(&config)
                .with_context(|| format!("Failed to load config {}", config.display()))?;
            compute_metrics_file(&file, &config.metrics()?)?;
        }

        Commands::Validate { file } => {
            validate_counts_file(&file)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Reject malformed timeframes while parsing arguments
fn timeframe_arg(s: &str) -> Result<String, String> {
    valid_timeframe(s)
        .map(|()| s.to_string())
        .map_err(|e| e.to_string())
}

/// Command line bounds, falling back to the configured timeframe
fn resolve_timeframe(
    config: &AppConfig,
    start: Option<String>,
    end: Option<String>,
) -> Result<Timeframe> {
    let start = start.unwrap_or_else(|| config.default_timeframe.start_date.clone());
    let end = end.unwrap_or_else(|| config.default_timeframe.end_date.clone());
    Ok(Timeframe::between(&start, &end)?)
}
