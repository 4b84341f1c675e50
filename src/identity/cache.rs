//! Bounded cache of resolved link mappings.

use super::links::LinkMapping;
use crate::utils::timeframe::Timeframe;
use std::collections::VecDeque;
use std::sync::Arc;

type CacheKey = (String, Timeframe);

/// Least-recently-used cache keyed by `(ledger, timeframe)`
#[derive(Debug)]
pub struct LinkCache {
    capacity: usize,
    // Most recently used at the back
    entries: VecDeque<(CacheKey, Arc<LinkMapping>)>,
}

impl LinkCache {
    /// Create a cache holding at most `capacity` mappings
    ///
    /// A capacity of zero disables caching.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn get(&mut self, ledger: &str, timeframe: &Timeframe) -> Option<Arc<LinkMapping>> {
        let position = self
            .entries
            .iter()
            .position(|((l, t), _)| l == ledger && t == timeframe)?;
        let entry = self.entries.remove(position)?;
        let mapping = Arc::clone(&entry.1);
        self.entries.push_back(entry);
        Some(mapping)
    }

    pub fn insert(&mut self, ledger: &str, timeframe: Timeframe, mapping: Arc<LinkMapping>) {
        if self.capacity == 0 {
            return;
        }
        self.entries
            .retain(|((l, t), _)| !(l == ledger && *t == timeframe));
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(((ledger.to_string(), timeframe), mapping));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
