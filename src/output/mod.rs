//! Output writers for block counts, classified blocks and metrics.
//!
//! This module handles writing data to disk in various formats:
//! - CSV tables of blocks per entity and chunk
//! - JSON classified blocks
//! - JSON metric reports

pub mod csv;
pub mod json;
pub mod path;

// Re-export main functions
pub use self::csv::{
    blocks_per_entity_to_string, parse_blocks_per_entity, read_blocks_per_entity,
    write_blocks_per_entity,
};
pub use json::{read_mapped_data, read_metrics, write_mapped_data, write_metrics};
pub use path::validate_path;
