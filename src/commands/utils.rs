use crate::metrics::{compute_all, Metric};
use crate::output::read_blocks_per_entity;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;

/// Validate a blocks-per-entity CSV file
pub fn validate_counts_file(file_path: &Path) -> Result<()> {
    println!("Validating block counts: {}", file_path.display());

    let table = read_blocks_per_entity(file_path)
        .with_context(|| format!("Invalid block counts file {}", file_path.display()))?;

    let total: u64 = (0..table.chunks().len()).map(|i| table.chunk_total(i)).sum();

    println!("✓ Valid blocks-per-entity CSV");
    println!("  Time chunks: {}", table.chunks().len());
    println!("  Entities: {}", table.len());
    println!("  Blocks: {}", total);

    Ok(())
}

/// Compute metrics from a blocks-per-entity CSV file
pub fn compute_metrics_file(
    file_path: &Path,
    metrics: &[Metric],
) -> Result<BTreeMap<String, Vec<Option<f64>>>> {
    let table = read_blocks_per_entity(file_path)
        .with_context(|| format!("Invalid block counts file {}", file_path.display()))?;

    let values = compute_all(metrics, &table);

    for (i, chunk) in table.chunks().iter().enumerate() {
        println!("{}", chunk);
        for (name, per_chunk) in &values {
            match per_chunk[i] {
                Some(v) => println!("  {:<22} {:.4}", name, v),
                None => println!("  {:<22} n/a", name),
            }
        }
    }

    Ok(values)
}

/// Display version information
pub fn display_version() {
    println!("Consensus Decentralization v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Block attribution and concentration metrics for blockchain ledgers.");
}
