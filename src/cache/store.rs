//! Cache Store Module
//!
//! Single-threaded cache engine combining HashMap storage with LRU tracking
//! and count/cost limits. [`BoundedCache`](super::BoundedCache) wraps it in a
//! lock for shared use.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use tracing::{debug, trace};

use crate::cache::{CacheEntry, CacheStats, LruTracker};

// == Cache Store ==
/// Cache storage with LRU eviction under an optional count and cost limit.
///
/// A limit of 0 means unbounded.
#[derive(Debug)]
pub struct CacheStore<K, V> {
    /// Key-value storage
    entries: HashMap<K, CacheEntry<V>>,
    /// LRU access tracker
    lru: LruTracker<K>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries (0 = unbounded)
    count_limit: usize,
    /// Maximum aggregate cost (0 = unbounded)
    cost_limit: u64,
    /// Sum of the cost of every stored entry
    total_cost: u64,
}

impl<K, V> CacheStore<K, V>
where
    K: Hash + Eq + Clone + Debug,
    V: Clone,
{
    // == Constructor ==
    /// Creates a new CacheStore with the given limits.
    ///
    /// # Arguments
    /// * `count_limit` - Maximum number of entries, 0 for no limit
    /// * `cost_limit` - Maximum total cost, 0 for no limit
    pub fn new(count_limit: usize, cost_limit: u64) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            count_limit,
            cost_limit,
            total_cost: 0,
        }
    }

    // == Set ==
    /// Stores a key-value pair with no cost.
    pub fn set(&mut self, key: K, value: V) {
        self.set_with_cost(key, value, 0);
    }

    // == Set With Cost ==
    /// Stores a key-value pair, charging `cost` against the cost limit.
    ///
    /// If the key already exists, the value and cost are replaced. Afterwards,
    /// entries are evicted least-recently-used first while any limit is
    /// exceeded. The most recent entry is never evicted by its own insert.
    ///
    /// A cost that would push the total past `u64::MAX` is clamped so the
    /// total stays the exact sum of stored costs.
    ///
    /// Returns the number of entries evicted.
    pub fn set_with_cost(&mut self, key: K, value: V, cost: u64) -> usize {
        let previous_cost = self.entries.get(&key).map_or(0, |entry| entry.cost);
        let base = self.total_cost - previous_cost;
        let cost = cost.min(u64::MAX - base);

        self.lru.touch(&key);
        self.entries.insert(key, CacheEntry::new(value, cost));
        self.total_cost = base + cost;

        let evicted = self.evict_to_limits();
        self.sync_occupancy();
        evicted
    }

    // == Get ==
    /// Retrieves a copy of the value stored under `key`.
    ///
    /// A hit marks the key as recently used.
    pub fn get(&mut self, key: &K) -> Option<V> {
        match self.entries.get(key) {
            Some(entry) => {
                let value = entry.value();
                self.stats.record_hit();
                self.lru.touch(key);
                trace!(?key, "cache hit");
                Some(value)
            }
            None => {
                self.stats.record_miss();
                trace!(?key, "cache miss");
                None
            }
        }
    }

    // == Remove ==
    /// Removes an entry by key, returning its value if it was present.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let entry = self.entries.remove(key)?;
        self.lru.remove(key);
        self.total_cost -= entry.cost;
        self.sync_occupancy();
        Some(entry.value)
    }

    // == Clear ==
    /// Removes every entry. Counters for hits, misses and evictions are kept.
    pub fn clear(&mut self) {
        let dropped = self.entries.len();
        self.entries.clear();
        self.lru.clear();
        self.total_cost = 0;
        self.sync_occupancy();
        debug!(dropped, "cache cleared");
    }

    /// Returns true if `key` is stored. Does not affect recency or stats.
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    // == Limits ==
    pub fn count_limit(&self) -> usize {
        self.count_limit
    }

    /// Changes the count limit. Takes effect on the next insert.
    pub fn set_count_limit(&mut self, limit: usize) {
        debug!(from = self.count_limit, to = limit, "count limit changed");
        self.count_limit = limit;
    }

    pub fn cost_limit(&self) -> u64 {
        self.cost_limit
    }

    /// Changes the cost limit. Takes effect on the next insert.
    pub fn set_cost_limit(&mut self, limit: u64) {
        debug!(from = self.cost_limit, to = limit, "cost limit changed");
        self.cost_limit = limit;
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    pub fn total_cost(&self) -> u64 {
        self.total_cost
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn over_limits(&self) -> bool {
        (self.count_limit > 0 && self.entries.len() > self.count_limit)
            || (self.cost_limit > 0 && self.total_cost > self.cost_limit)
    }

    // == Evict To Limits ==
    /// Evicts least recently used entries until every limit holds or a
    /// single entry remains.
    fn evict_to_limits(&mut self) -> usize {
        let mut evicted = 0;

        while self.over_limits() && self.entries.len() > 1 {
            let Some(key) = self.lru.evict_oldest() else {
                break;
            };
            if let Some(entry) = self.entries.remove(&key) {
                self.total_cost -= entry.cost;
                self.stats.record_eviction();
                evicted += 1;
                debug!(?key, cost = entry.cost, "evicted entry");
            }
        }

        evicted
    }

    fn sync_occupancy(&mut self) {
        self.stats.set_occupancy(self.entries.len(), self.total_cost);
    }
}
