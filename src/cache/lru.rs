//! LRU Tracker Module
//!
//! Implements Least Recently Used tracking for cache eviction.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

// == LRU Tracker ==
/// Tracks access order for LRU eviction strategy.
///
/// Every touch stamps the key with a fresh, strictly increasing tick.
/// `order` is sorted by tick, so:
/// - First entry = Least recently used
/// - Last entry = Most recently used
#[derive(Debug)]
pub struct LruTracker<K> {
    /// Keys by access tick
    order: BTreeMap<u64, K>,
    /// Latest tick of each tracked key
    ticks: HashMap<K, u64>,
    /// Next tick to hand out
    next_tick: u64,
}

impl<K> Default for LruTracker<K> {
    fn default() -> Self {
        Self {
            order: BTreeMap::new(),
            ticks: HashMap::new(),
            next_tick: 0,
        }
    }
}

impl<K: Hash + Eq + Clone> LruTracker<K> {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as recently used.
    ///
    /// Existing keys lose their old tick; new keys are simply added.
    pub fn touch(&mut self, key: &K) {
        let tick = self.next_tick;
        self.next_tick += 1;

        if let Some(old) = self.ticks.insert(key.clone(), tick) {
            self.order.remove(&old);
        }
        self.order.insert(tick, key.clone());
    }

    // == Remove ==
    /// Removes a key from the tracker.
    pub fn remove(&mut self, key: &K) {
        if let Some(tick) = self.ticks.remove(key) {
            self.order.remove(&tick);
        }
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    ///
    /// Returns None if tracker is empty.
    pub fn evict_oldest(&mut self) -> Option<K> {
        let (_, key) = self.order.pop_first()?;
        self.ticks.remove(&key);
        Some(key)
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    pub fn peek_oldest(&self) -> Option<&K> {
        self.order.first_key_value().map(|(_, key)| key)
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.order.clear();
        self.ticks.clear();
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    // == Contains ==
    /// Checks if a key is being tracked.
    pub fn contains(&self, key: &K) -> bool {
        self.ticks.contains_key(key)
    }
}
