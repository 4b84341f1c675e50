//! Raw block records.
//!
//! Parses raw block JSON into structured data. Each record carries a
//! timestamp, an optional identifier string (coinbase tag, pool ticker)
//! and zero or more reward addresses.

use crate::utils::config::BLOCK_FIELD_NAMES;
use crate::utils::error::ParseError;
use chrono::NaiveDate;
use log::{debug, warn};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// A single raw block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Block height
    pub number: u64,

    /// Block time, starting with `YYYY-MM-DD`
    pub timestamp: String,

    /// Coinbase tag, pool ticker or other protocol identifier
    #[serde(default)]
    pub identifiers: Option<String>,

    /// Addresses that received the block reward
    ///
    /// Raw data encodes these either as an array or as a comma-separated
    /// string.
    #[serde(default, deserialize_with = "deserialize_addresses")]
    pub reward_addresses: Option<Vec<String>>,
}

impl Block {
    /// Day the block was produced
    pub fn date(&self) -> Option<NaiveDate> {
        let day = self.timestamp.get(..10)?;
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }

    /// Identifier string, if non-empty
    pub fn identifier(&self) -> Option<&str> {
        self.identifiers.as_deref().filter(|s| !s.is_empty())
    }

    /// Reward addresses, if any
    ///
    /// Returns `None` when the block carries no reward signal at all.
    pub fn reward_addresses(&self) -> Option<&[String]> {
        self.reward_addresses
            .as_deref()
            .filter(|addresses| !addresses.is_empty())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAddresses {
    List(Vec<String>),
    Joined(String),
}

fn deserialize_addresses<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawAddresses> = Option::deserialize(deserializer)?;
    let addresses = match raw {
        None => return Ok(None),
        Some(RawAddresses::List(list)) => list,
        Some(RawAddresses::Joined(joined)) => joined.split(',').map(str::to_string).collect(),
    };

    let addresses: Vec<String> = addresses
        .into_iter()
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .collect();

    Ok(Some(addresses))
}

/// Parse raw block JSON
///
/// **Public** - main entry point for parsing
///
/// Accepts a top-level array of blocks, or an object wrapping the array
/// under one of the known field names.
///
/// # Errors
/// * `ParseError::InvalidFormat` - no block array found
/// * `ParseError::JsonError` - a block record has the wrong shape
pub fn parse_blocks(raw: serde_json::Value) -> Result<Vec<Block>, ParseError> {
    let array = match raw {
        array @ serde_json::Value::Array(_) => array,
        serde_json::Value::Object(mut obj) => BLOCK_FIELD_NAMES
            .iter()
            .find_map(|field| obj.remove(*field).filter(serde_json::Value::is_array))
            .ok_or_else(|| {
                ParseError::InvalidFormat(format!(
                    "expected a block array under one of: {}",
                    BLOCK_FIELD_NAMES.join(", ")
                ))
            })?,
        _ => {
            return Err(ParseError::InvalidFormat(
                "raw data must be an array or an object".to_string(),
            ))
        }
    };

    let blocks: Vec<Block> = serde_json::from_value(array)?;

    let undated = blocks.iter().filter(|b| b.date().is_none()).count();
    if undated > 0 {
        warn!("{} blocks have a timestamp without a leading date", undated);
    }
    debug!("Parsed {} blocks", blocks.len());

    Ok(blocks)
}

/// Read and parse a raw block data file
pub fn read_blocks(path: impl AsRef<Path>) -> Result<Vec<Block>, ParseError> {
    let path = path.as_ref();
    debug!("Reading raw blocks from: {}", path.display());

    let file = File::open(path)?;
    let raw: serde_json::Value = serde_json::from_reader(BufReader::new(file))?;
    parse_blocks(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reward_addresses_as_string() {
        let raw = json!([{
            "number": 1,
            "timestamp": "2021-03-04 10:00:00 UTC",
            "identifiers": "/slush/",
            "reward_addresses": "addr1, addr2"
        }]);

        let blocks = parse_blocks(raw).unwrap();
        assert_eq!(
            blocks[0].reward_addresses(),
            Some(&["addr1".to_string(), "addr2".to_string()][..])
        );
        assert_eq!(blocks[0].identifier(), Some("/slush/"));
    }

    #[test]
    fn test_missing_and_empty_signals() {
        let raw = json!({"blocks": [
            {"number": 1, "timestamp": "2021-03-04"},
            {"number": 2, "timestamp": "2021-03-04", "identifiers": "", "reward_addresses": ""},
            {"number": 3, "timestamp": "2021-03-04", "reward_addresses": null},
            {"number": 4, "timestamp": "2021-03-04", "reward_addresses": ["a"]}
        ]});

        let blocks = parse_blocks(raw).unwrap();
        assert_eq!(blocks.len(), 4);
        assert!(blocks[0].reward_addresses().is_none());
        assert!(blocks[1].reward_addresses().is_none());
        assert!(blocks[1].identifier().is_none());
        assert!(blocks[2].reward_addresses().is_none());
        assert_eq!(blocks[3].reward_addresses().map(|a| a.len()), Some(1));
    }

    #[test]
    fn test_block_date() {
        let raw = json!([
            {"number": 1, "timestamp": "2021-03-04T10:00:00"},
            {"number": 2, "timestamp": "yesterday"}
        ]);
        let blocks = parse_blocks(raw).unwrap();
        assert_eq!(blocks[0].date(), NaiveDate::from_ymd_opt(2021, 3, 4));
        assert_eq!(blocks[1].date(), None);
    }

    #[test]
    fn test_wrapped_array_skips_non_array_fields() {
        let raw = json!({
            "blocks": "see data",
            "data": [{"number": 7, "timestamp": "2021-03-04"}]
        });

        let blocks = parse_blocks(raw).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].number, 7);
    }

    #[test]
    fn test_invalid_shapes() {
        assert!(matches!(
            parse_blocks(json!({"rows": []})),
            Err(ParseError::InvalidFormat(_))
        ));
        assert!(matches!(parse_blocks(json!(42)), Err(ParseError::InvalidFormat(_))));
        assert!(matches!(
            parse_blocks(json!([{"timestamp": "2021-01-01"}])),
            Err(ParseError::JsonError(_))
        ));
    }
}
