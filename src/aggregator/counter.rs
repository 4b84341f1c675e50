//! Classification of blocks and per-entity block counts.

use super::chunks::TimeChunk;
use crate::identity::{IdentityData, LinkMapping, LinkResolver};
use crate::mapping::Classifier;
use crate::parser::{Block, ClassifiedBlock};
use crate::utils::error::AggregateError;
use log::{debug, info};
use std::collections::HashMap;
use std::sync::Arc;

/// Blocks produced by each entity in each time chunk
///
/// Entities keep the order in which they were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlocksPerEntity {
    chunks: Vec<String>,
    entities: Vec<String>,
    counts: Vec<Vec<u64>>,
    index: HashMap<String, usize>,
}

impl BlocksPerEntity {
    /// Empty table over the given chunk labels
    pub fn new(chunks: Vec<String>) -> Self {
        Self {
            chunks,
            ..Default::default()
        }
    }

    pub fn chunks(&self) -> &[String] {
        &self.chunks
    }

    /// Add `blocks` to an entity's count in chunk `chunk`
    ///
    /// # Panics
    /// If `chunk` is not a valid chunk index.
    pub fn add(&mut self, entity: &str, chunk: usize, blocks: u64) {
        let row = self.row_mut(entity);
        row[chunk] += blocks;
    }

    pub fn increment(&mut self, entity: &str, chunk: usize) {
        self.add(entity, chunk, 1);
    }

    /// Append a whole row
    ///
    /// Returns `false` without changing anything if the entity already has a
    /// row or the row length does not match the chunk count.
    pub fn insert_row(&mut self, entity: String, counts: Vec<u64>) -> bool {
        if counts.len() != self.chunks.len() || self.index.contains_key(&entity) {
            return false;
        }
        self.index.insert(entity.clone(), self.entities.len());
        self.entities.push(entity);
        self.counts.push(counts);
        true
    }

    pub fn counts_of(&self, entity: &str) -> Option<&[u64]> {
        self.index.get(entity).map(|&i| self.counts[i].as_slice())
    }

    /// Rows in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u64])> {
        self.entities
            .iter()
            .zip(&self.counts)
            .map(|(entity, counts)| (entity.as_str(), counts.as_slice()))
    }

    /// Every entity's count in one chunk, in row order
    pub fn chunk_counts(&self, chunk: usize) -> Vec<u64> {
        self.counts.iter().map(|row| row[chunk]).collect()
    }

    /// Blocks counted in one chunk
    pub fn chunk_total(&self, chunk: usize) -> u64 {
        self.counts.iter().map(|row| row[chunk]).sum()
    }

    /// Number of entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    fn row_mut(&mut self, entity: &str) -> &mut Vec<u64> {
        let i = match self.index.get(entity) {
            Some(&i) => i,
            None => {
                let i = self.entities.len();
                self.index.insert(entity.to_string(), i);
                self.entities.push(entity.to_string());
                self.counts.push(vec![0; self.chunks.len()]);
                i
            }
        };
        &mut self.counts[i]
    }
}

/// Result of aggregating a ledger's blocks
#[derive(Debug, Clone)]
pub struct Aggregation {
    pub blocks_per_entity: BlocksPerEntity,

    /// Blocks with their attributed entity, in input order
    pub classified: Vec<ClassifiedBlock>,
}

/// Classify blocks and count them per entity and chunk
///
/// **Public** - main entry point for aggregation
///
/// # Arguments
/// * `ledger` - Ledger the blocks belong to
/// * `blocks` - Raw blocks, in any order
/// * `chunks` - Non-overlapping chunks, in any order
/// * `classifier` - Classification strategy of the ledger
/// * `identity` - Identity data of the ledger
/// * `resolver` - Link resolution, queried once per chunk that has blocks
///
/// # Errors
/// * `AggregateError::UnassignableBlock` - a block lies outside every chunk
/// * `AggregateError::InvalidTimestamp` - a block timestamp has no date
/// * `AggregateError::Links` - link resolution failed for a chunk
pub fn aggregate(
    ledger: &str,
    blocks: &[Block],
    chunks: &[TimeChunk],
    classifier: Classifier,
    identity: &IdentityData,
    resolver: &mut LinkResolver,
) -> Result<Aggregation, AggregateError> {
    debug!(
        "Aggregating {} {} blocks over {} chunks",
        blocks.len(),
        ledger,
        chunks.len()
    );

    let labels = chunks.iter().map(|c| c.label.clone()).collect();
    let mut blocks_per_entity = BlocksPerEntity::new(labels);
    let mut classified = Vec::with_capacity(blocks.len());
    let mut mappings: Vec<Option<Arc<LinkMapping>>> = vec![None; chunks.len()];

    for block in blocks {
        let chunk = find_chunk(block, chunks)?;

        let links = match &mappings[chunk] {
            Some(links) => Arc::clone(links),
            None => {
                let links = resolver.resolve_links(ledger, &chunks[chunk].timeframe)?;
                mappings[chunk] = Some(Arc::clone(&links));
                links
            }
        };

        let entity = classifier.classify(block, identity, &links);
        blocks_per_entity.increment(entity.name(), chunk);
        classified.push(ClassifiedBlock {
            number: block.number,
            timestamp: block.timestamp.clone(),
            entity: entity.name().to_string(),
        });
    }

    info!(
        "Attributed {} {} blocks to {} entities",
        classified.len(),
        ledger,
        blocks_per_entity.len()
    );

    Ok(Aggregation {
        blocks_per_entity,
        classified,
    })
}

/// Index of the chunk containing a block
fn find_chunk(block: &Block, chunks: &[TimeChunk]) -> Result<usize, AggregateError> {
    let date = block.date().ok_or_else(|| AggregateError::InvalidTimestamp {
        number: block.number,
        timestamp: block.timestamp.clone(),
    })?;

    chunks
        .iter()
        .position(|chunk| chunk.timeframe.contains(date))
        .ok_or_else(|| AggregateError::UnassignableBlock {
            number: block.number,
            timestamp: block.timestamp.clone(),
        })
}
