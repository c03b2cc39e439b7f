//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, and evictions.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of lookups that found a value
    pub hits: u64,
    /// Number of lookups that found nothing
    pub misses: u64,
    /// Number of entries evicted to respect a limit
    pub evictions: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
    /// Current sum of entry costs
    pub total_cost: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    // == Update Occupancy ==
    /// Updates the entry count and aggregate cost.
    pub fn set_occupancy(&mut self, entries: usize, cost: u64) {
        self.total_entries = entries;
        self.total_cost = cost;
    }
}
