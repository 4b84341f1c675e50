//! Schema definitions for identity datasets and JSON output files.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Entry of `identifiers/<ledger>.json`, keyed by tag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentifierInfo {
    /// Display name of the entity behind the tag
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Entry of `addresses/<ledger>.json`, keyed by address
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressInfo {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// One claimed member of a cluster or legal-link group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimEntry {
    /// Name of the entity that is owned
    pub name: String,

    /// First timeframe of the claim; empty means unbounded
    #[serde(default)]
    pub from: String,

    /// First timeframe no longer covered; empty means unbounded
    #[serde(default)]
    pub to: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Entry of `special_addresses.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialAddressEntry {
    pub address: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// A block with the entity it was attributed to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedBlock {
    pub number: u64,
    pub timestamp: String,
    pub entity: String,
}

/// Metric values per time chunk, written to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    pub ledger: String,

    /// Chunk labels in chronological order
    pub chunks: Vec<String>,

    /// Metric name -> one value per chunk (`null` when undefined)
    pub values: BTreeMap<String, Vec<Option<f64>>>,

    /// Timestamp when the report was generated
    pub generated_at: String,
}
