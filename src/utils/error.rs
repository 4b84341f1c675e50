//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while parsing a timeframe string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeframeError {
    #[error("Invalid timeframe '{0}': use YYYY-MM-DD (day and month can be omitted)")]
    InvalidFormat(String),
}

/// Errors that can occur while loading identity datasets
#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid identity data in {path}: {source}")]
    InvalidData {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors that can occur while resolving ownership links
#[derive(Error, Debug)]
pub enum LinkError {
    #[error("Circular dependency: {claimant}, {owner}")]
    CircularOwnership { claimant: String, owner: String },

    #[error("Invalid timeframe in claim data: {0}")]
    Timeframe(#[from] TimeframeError),

    #[error(transparent)]
    Identity(#[from] IdentityError),
}

/// Errors that can occur while aggregating classified blocks
#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Block {number} with timestamp {timestamp} falls outside every time chunk")]
    UnassignableBlock { number: u64, timestamp: String },

    #[error("Block {number} has an invalid timestamp: {timestamp}")]
    InvalidTimestamp { number: u64, timestamp: String },

    #[error(transparent)]
    Links(#[from] LinkError),
}

/// Errors that can occur during raw block parsing
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid block data format: {0}")]
    InvalidFormat(String),

    #[error("Failed to read raw data: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),

    #[error("Malformed CSV at line {line}: {reason}")]
    MalformedCsv { line: usize, reason: String },
}

/// Errors that can occur while loading the configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadFailed(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    ParseFailed(#[from] toml::de::Error),

    #[error("Metrics '{0}' and '{1}' belong to the same family and must use the same parameters")]
    InconsistentFamily(String, String),

    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    #[error(transparent)]
    Timeframe(#[from] TimeframeError),
}
