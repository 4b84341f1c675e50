//! Block parsing and schema definitions.
//!
//! This module handles:
//! - Parsing raw block JSON
//! - Identity dataset record shapes
//! - Defining output schema

pub mod block;
pub mod schema;

// Re-export main types
pub use block::{parse_blocks, read_blocks, Block};
pub use schema::{
    AddressInfo, ClaimEntry, ClassifiedBlock, IdentifierInfo, MetricsReport, SpecialAddressEntry,
};
