//! Aggregation of classified blocks into per-entity counts.
//!
//! This module handles:
//! - Splitting a timeframe into labelled chunks
//! - Classifying each block with the link mapping of its chunk
//! - Counting blocks per entity and chunk

pub mod chunks;
pub mod counter;

// Re-export main types and functions
pub use chunks::{
    blocks_per_entity_filename, build_chunks, chunk_labels, metrics_filename, time_chunks,
    Granularity, TimeChunk,
};
pub use counter::{aggregate, Aggregation, BlocksPerEntity};
