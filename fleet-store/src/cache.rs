//! Process-wide label cache with compute-once-per-key population.
//!
//! Lookup labels (fuel types, emission classes, contract kinds) change
//! rarely but are read on nearly every request. Reads populate the cache
//! lazily; any write to the backing data must call [`LabelCache::invalidate`]
//! before the next read.

use std::sync::Arc;

use anyhow::Result;
use dashmap::DashMap;
use once_cell::sync::OnceCell;

#[derive(Default)]
pub struct LabelCache {
    entries: DashMap<String, Arc<OnceCell<String>>>,
}

impl LabelCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached label for `code`, running `load` on a miss.
    ///
    /// Concurrent misses for the same code converge on a single load:
    /// one caller runs `load`, the rest wait on the cell. A failed load
    /// leaves the cell empty so a later read can retry.
    pub fn get_or_load<F>(&self, code: &str, load: F) -> Result<String>
    where
        F: FnOnce() -> Result<String>,
    {
        let cell = self
            .entries
            .entry(code.to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone();
        cell.get_or_try_init(load).cloned()
    }

    /// Drop one code. Must be called after mutating its backing row.
    pub fn invalidate(&self, code: &str) {
        self.entries.remove(code);
    }

    pub fn invalidate_all(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
