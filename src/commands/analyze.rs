//! Analyze command implementation.
//!
//! For every ledger the analyze command:
//! 1. Loads raw block data
//! 2. Loads the ledger's identity data
//! 3. Splits the timeframe into chunks
//! 4. Classifies and counts blocks per entity and chunk
//! 5. Writes the counts and the classified blocks
//! 6. Computes and writes the concentration metrics

use super::models::{AnalyzeArgs, LedgerReport};
use crate::aggregator::{
    aggregate, blocks_per_entity_filename, build_chunks, metrics_filename, BlocksPerEntity,
};
use crate::identity::{LinkResolver, MappingInfo};
use crate::mapping::Classifier;
use crate::metrics::compute_all;
use crate::output::{write_blocks_per_entity, write_mapped_data, write_metrics};
use crate::parser::{read_blocks, MetricsReport};
use crate::utils::config::MAPPED_DATA_FILE;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::time::Instant;

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Raw data or identity data that cannot be read
/// * Circular ownership in the claim data
/// * Blocks outside every chunk
/// * File write errors
pub fn execute_analyze(args: AnalyzeArgs) -> Result<Vec<LedgerReport>> {
    let start_time = Instant::now();

    info!(
        "Analyzing {} ledger(s) from {} ({} chunks)",
        args.ledgers.len(),
        args.timeframe,
        args.granularity.adverb()
    );

    let mut resolver = LinkResolver::new(MappingInfo::new(&args.mapping_info_dir));
    let mut reports = Vec::with_capacity(args.ledgers.len());

    for ledger in &args.ledgers {
        let report = analyze_ledger(&args, ledger, &mut resolver)
            .with_context(|| format!("Failed to analyze {}", ledger))?;

        if args.print_summary {
            print_summary(&report);
        }
        reports.push(report);
    }

    let elapsed = start_time.elapsed();
    info!("Analysis completed in {:.2}s", elapsed.as_secs_f64());

    Ok(reports)
}

/// Run the whole pipeline for one ledger
///
/// **Public** - lets callers share one resolver across ledgers
pub fn analyze_ledger(
    args: &AnalyzeArgs,
    ledger: &str,
    resolver: &mut LinkResolver,
) -> Result<LedgerReport> {
    // Step 1: Load raw blocks
    info!("[{}] Step 1/6: Loading raw block data...", ledger);
    let raw_path = args.raw_data_dir.join(format!("{}_raw_data.json", ledger));
    let all_blocks = read_blocks(&raw_path)
        .with_context(|| format!("Failed to read raw data from {}", raw_path.display()))?;

    let blocks: Vec<_> = all_blocks
        .into_iter()
        .filter(|block| block.date().map_or(true, |d| args.timeframe.contains(d)))
        .collect();
    debug!("[{}] {} blocks inside {}", ledger, blocks.len(), args.timeframe);
    if blocks.is_empty() {
        warn!("[{}] No blocks inside {}", ledger, args.timeframe);
    }

    // Step 2: Load identity data
    info!("[{}] Step 2/6: Loading identity data...", ledger);
    let identity = resolver
        .mapping_info()
        .identity_data(ledger)
        .context("Failed to load identity data")?;

    // Step 3: Chunks
    info!("[{}] Step 3/6: Building {} chunks...", ledger, args.granularity.adverb());
    let chunks = build_chunks(&args.timeframe, args.granularity);
    debug!("[{}] {} chunks", ledger, chunks.len());

    // Step 4: Classify and count
    info!("[{}] Step 4/6: Classifying blocks...", ledger);
    let classifier = Classifier::for_ledger(ledger);
    let aggregation = aggregate(ledger, &blocks, &chunks, classifier, &identity, resolver)
        .context("Failed to aggregate blocks")?;

    // Step 5: Write counts and classified blocks
    info!("[{}] Step 5/6: Writing block counts...", ledger);
    let ledger_dir = ledger_output_dir(args, ledger);
    let csv_path = ledger_dir.join(blocks_per_entity_filename(args.granularity, &args.timeframe));
    write_blocks_per_entity(&aggregation.blocks_per_entity, &csv_path)
        .context("Failed to write blocks per entity")?;
    info!("✓ Blocks per entity written to: {}", csv_path.display());

    let mapped_data_path = ledger_dir.join(MAPPED_DATA_FILE);
    write_mapped_data(&aggregation.classified, &mapped_data_path)
        .context("Failed to write mapped data")?;

    // Step 6: Metrics
    info!("[{}] Step 6/6: Computing {} metrics...", ledger, args.metrics.len());
    let metrics = metrics_report(ledger, &aggregation.blocks_per_entity, args);
    let metrics_path = ledger_dir.join(metrics_filename(args.granularity, &args.timeframe));
    write_metrics(&metrics, &metrics_path).context("Failed to write metrics")?;
    info!("✓ Metrics written to: {}", metrics_path.display());

    Ok(LedgerReport {
        ledger: ledger.to_string(),
        blocks_per_entity: aggregation.blocks_per_entity,
        metrics,
        csv_path,
        metrics_path,
        mapped_data_path,
    })
}

fn metrics_report(ledger: &str, blocks_per_entity: &BlocksPerEntity, args: &AnalyzeArgs) -> MetricsReport {
    MetricsReport {
        ledger: ledger.to_string(),
        chunks: blocks_per_entity.chunks().to_vec(),
        values: compute_all(&args.metrics, blocks_per_entity),
        generated_at: chrono::Utc::now().to_rfc3339(),
    }
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.ledgers.is_empty() {
        anyhow::bail!("At least one ledger is required");
    }

    for ledger in &args.ledgers {
        if ledger.is_empty()
            || !ledger
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            anyhow::bail!(
                "Invalid ledger name '{}': use lowercase letters, digits and underscores",
                ledger
            );
        }
    }

    if !args.raw_data_dir.is_dir() {
        anyhow::bail!(
            "Raw data directory does not exist: {}",
            args.raw_data_dir.display()
        );
    }

    if !args.mapping_info_dir.is_dir() {
        warn!(
            "Mapping information directory {} does not exist; blocks will be attributed by raw address only",
            args.mapping_info_dir.display()
        );
    }

    Ok(())
}

/// Print a text summary of one ledger's report
fn print_summary(report: &LedgerReport) {
    println!("\n{}", "=".repeat(80));
    println!("{} SUMMARY", report.ledger.to_uppercase());
    println!("{}", "=".repeat(80));
    println!("Entities: {}", report.blocks_per_entity.len());
    for (i, chunk) in report.metrics.chunks.iter().enumerate() {
        let values: Vec<String> = report
            .metrics
            .values
            .iter()
            .map(|(name, values)| match values[i] {
                Some(v) => format!("{}={:.4}", name, v),
                None => format!("{}=n/a", name),
            })
            .collect();
        println!(
            "{:<28} blocks={:<8} {}",
            chunk,
            report.blocks_per_entity.chunk_total(i),
            values.join(" ")
        );
    }
    println!("{}", "=".repeat(80));
}

/// Output directory of a ledger
pub fn ledger_output_dir(args: &AnalyzeArgs, ledger: &str) -> PathBuf {
    args.output_dir.join(ledger)
}
