//! Concentration metrics over per-entity block counts.
//!
//! Every metric is a pure function of the count distribution and returns
//! `None` when no blocks were produced.

pub mod entropy;
pub mod gini;
pub mod hhi;
pub mod nakamoto;

pub use entropy::{compute_entropy, compute_entropy_percentage};
pub use gini::{compute_gini, gini};
pub use hhi::compute_hhi;
pub use nakamoto::compute_nakamoto_coefficient;

use crate::aggregator::BlocksPerEntity;
use crate::utils::config::MetricParams;
use std::collections::BTreeMap;

const DEFAULT_ENTROPY_ALPHA: f64 = 1.0;

/// A configured metric
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    Gini,
    Hhi,
    NakamotoCoefficient,
    Entropy { alpha: f64 },
    EntropyPercentage { alpha: f64 },
}

impl Metric {
    /// Metric for a config entry, or `None` if the name is unknown
    pub fn from_config(name: &str, params: &MetricParams) -> Option<Self> {
        let alpha = params.alpha.unwrap_or(DEFAULT_ENTROPY_ALPHA);
        match name {
            "gini" => Some(Metric::Gini),
            "hhi" => Some(Metric::Hhi),
            "nakamoto_coefficient" => Some(Metric::NakamotoCoefficient),
            "entropy" => Some(Metric::Entropy { alpha }),
            "entropy_percentage" => Some(Metric::EntropyPercentage { alpha }),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Metric::Gini => "gini",
            Metric::Hhi => "hhi",
            Metric::NakamotoCoefficient => "nakamoto_coefficient",
            Metric::Entropy { .. } => "entropy",
            Metric::EntropyPercentage { .. } => "entropy_percentage",
        }
    }

    pub fn compute(&self, blocks_per_entity: &[u64]) -> Option<f64> {
        match *self {
            Metric::Gini => compute_gini(blocks_per_entity),
            Metric::Hhi => compute_hhi(blocks_per_entity),
            Metric::NakamotoCoefficient => compute_nakamoto_coefficient(blocks_per_entity),
            Metric::Entropy { alpha } => compute_entropy(blocks_per_entity, alpha),
            Metric::EntropyPercentage { alpha } => {
                compute_entropy_percentage(blocks_per_entity, alpha)
            }
        }
    }
}

/// Evaluate metrics for every chunk of a table
///
/// Entities that produced nothing in a chunk do not take part in that
/// chunk's distribution.
pub fn compute_all(
    metrics: &[Metric],
    blocks_per_entity: &BlocksPerEntity,
) -> BTreeMap<String, Vec<Option<f64>>> {
    let distributions: Vec<Vec<u64>> = (0..blocks_per_entity.chunks().len())
        .map(|chunk| {
            blocks_per_entity
                .chunk_counts(chunk)
                .into_iter()
                .filter(|&blocks| blocks > 0)
                .collect()
        })
        .collect();

    metrics
        .iter()
        .map(|metric| {
            let values = distributions.iter().map(|d| metric.compute(d)).collect();
            (metric.name().to_string(), values)
        })
        .collect()
}
