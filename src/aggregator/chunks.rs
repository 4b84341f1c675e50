//! Time chunks over which blocks are counted.

use crate::utils::timeframe::{last_day_of_month, Timeframe};
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Size of the chunks a timeframe is split into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    Month,
    Year,
    All,
}

impl Granularity {
    /// Adverb used in output file names
    pub fn adverb(&self) -> &'static str {
        match self {
            Granularity::Day => "daily",
            Granularity::Week => "weekly",
            Granularity::Month => "monthly",
            Granularity::Year => "yearly",
            Granularity::All => "all",
        }
    }
}

/// A labelled chunk of time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeChunk {
    pub label: String,
    pub timeframe: Timeframe,
}

/// Split a timeframe into consecutive chunks
///
/// **Public** - chunk boundaries for aggregation
///
/// The first and last chunk are clipped to the timeframe. Weeks are runs
/// of seven days starting at the timeframe's first day.
pub fn time_chunks(timeframe: &Timeframe, granularity: Granularity) -> Vec<Timeframe> {
    let mut chunks = Vec::new();
    let mut start = timeframe.start;

    loop {
        let natural_end = match granularity {
            Granularity::Day => Some(start),
            Granularity::Week => start.checked_add_signed(Duration::days(6)),
            Granularity::Month => last_day_of_month(start.year(), start.month()),
            Granularity::Year => NaiveDate::from_ymd_opt(start.year(), 12, 31),
            Granularity::All => Some(timeframe.end),
        };
        let end = natural_end.map_or(timeframe.end, |end| end.min(timeframe.end));
        chunks.push(Timeframe { start, end });

        match end.succ_opt() {
            Some(next) if next <= timeframe.end => start = next,
            _ => break,
        }
    }

    chunks
}

/// Labels of chunks as they appear in output files
pub fn chunk_labels(chunks: &[Timeframe], granularity: Granularity) -> Vec<String> {
    chunks
        .iter()
        .map(|chunk| match granularity {
            Granularity::Day => chunk.start.format("%Y-%m-%d").to_string(),
            Granularity::Month => chunk.start.format("%b-%Y").to_string(),
            Granularity::Year => chunk.start.format("%Y").to_string(),
            Granularity::Week | Granularity::All => format!(
                "{} to {}",
                chunk.start.format("%Y-%m-%d"),
                chunk.end.format("%Y-%m-%d")
            ),
        })
        .collect()
}

/// Chunks of a timeframe together with their labels
pub fn build_chunks(timeframe: &Timeframe, granularity: Granularity) -> Vec<TimeChunk> {
    let chunks = time_chunks(timeframe, granularity);
    let labels = chunk_labels(&chunks, granularity);
    labels
        .into_iter()
        .zip(chunks)
        .map(|(label, timeframe)| TimeChunk { label, timeframe })
        .collect()
}

/// Name of the blocks-per-entity CSV for a granularity and timeframe
pub fn blocks_per_entity_filename(granularity: Granularity, timeframe: &Timeframe) -> String {
    format!(
        "{}_from_{}_to_{}.csv",
        granularity.adverb(),
        timeframe.start,
        timeframe.end
    )
}

/// Name of the metrics JSON for a granularity and timeframe
pub fn metrics_filename(granularity: Granularity, timeframe: &Timeframe) -> String {
    format!(
        "{}_metrics_from_{}_to_{}.json",
        granularity.adverb(),
        timeframe.start,
        timeframe.end
    )
}
