//! JSON output writers for classified blocks and metric reports.

use super::path::{file_size, prepare_path};
use crate::parser::schema::{ClassifiedBlock, MetricsReport};
use crate::utils::error::OutputError;
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Write classified blocks to a JSON file
///
/// **Public** - main entry point for mapped data output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_mapped_data(
    blocks: &[ClassifiedBlock],
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    write_json(blocks, output_path.as_ref())
}

/// Read classified blocks from a JSON file
pub fn read_mapped_data(input_path: impl AsRef<Path>) -> Result<Vec<ClassifiedBlock>, OutputError> {
    let blocks: Vec<ClassifiedBlock> = read_json(input_path.as_ref())?;
    debug!("Mapped data loaded: {} blocks", blocks.len());
    Ok(blocks)
}

/// Write a metrics report to a JSON file
pub fn write_metrics(report: &MetricsReport, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    write_json(report, output_path.as_ref())
}

/// Read a metrics report from a JSON file
pub fn read_metrics(input_path: impl AsRef<Path>) -> Result<MetricsReport, OutputError> {
    let report: MetricsReport = read_json(input_path.as_ref())?;
    debug!(
        "Metrics loaded: {} for {} chunks",
        report.ledger,
        report.chunks.len()
    );
    Ok(report)
}

fn write_json<T: Serialize + ?Sized>(value: &T, output_path: &Path) -> Result<(), OutputError> {
    info!("Writing JSON to: {}", output_path.display());

    prepare_path(output_path)?;
    let writer = BufWriter::new(File::create(output_path)?);
    serde_json::to_writer_pretty(writer, value)?;

    info!("JSON written successfully ({} bytes)", file_size(output_path));
    Ok(())
}

fn read_json<T: DeserializeOwned>(input_path: &Path) -> Result<T, OutputError> {
    debug!("Reading JSON from: {}", input_path.display());

    let file = File::open(input_path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
