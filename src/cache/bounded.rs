//! Bounded Cache Module
//!
//! Thread-safe front for [`CacheStore`] with an atomic-in-intent
//! fetch-or-create.

use std::fmt::Debug;
use std::hash::Hash;

use parking_lot::Mutex;

use crate::cache::{CacheStats, CacheStore};
use crate::config::MemoConfig;

// == Bounded Cache ==
/// A thread-safe key/value store with optional count and cost limits.
///
/// Every operation takes the internal lock for a short, bounded critical
/// section. The lock is never held while a `fetch` creator runs, so slow
/// computations do not block other keys.
///
/// Eviction is least-recently-used internally, but callers must treat the
/// order as unspecified: only "approximately within limits" is promised.
#[derive(Debug)]
pub struct BoundedCache<K, V> {
    store: Mutex<CacheStore<K, V>>,
}

impl<K, V> BoundedCache<K, V>
where
    K: Hash + Eq + Clone + Debug,
    V: Clone,
{
    // == Constructor ==
    /// Creates a new cache. A limit of 0 means unbounded.
    ///
    /// # Arguments
    /// * `count_limit` - Maximum number of entries
    /// * `cost_limit` - Maximum aggregate cost of entries
    pub fn new(count_limit: usize, cost_limit: u64) -> Self {
        Self {
            store: Mutex::new(CacheStore::new(count_limit, cost_limit)),
        }
    }

    /// Creates a cache with no limits.
    pub fn unbounded() -> Self {
        Self::new(0, 0)
    }

    /// Creates a cache using the limits from `config`.
    pub fn from_config(config: &MemoConfig) -> Self {
        Self::new(config.count_limit, config.cost_limit)
    }

    // == Get ==
    /// Returns a copy of the value stored under `key`, if any.
    pub fn get(&self, key: &K) -> Option<V> {
        self.store.lock().get(key)
    }

    // == Set ==
    /// Inserts or replaces the value for `key`.
    ///
    /// May evict unrelated entries if a limit is exceeded.
    pub fn set(&self, key: K, value: V) {
        self.store.lock().set(key, value);
    }

    /// Inserts or replaces the value for `key`, charging `cost` against
    /// the cost limit.
    pub fn set_with_cost(&self, key: K, value: V, cost: u64) {
        self.store.lock().set_with_cost(key, value, cost);
    }

    // == Remove ==
    /// Deletes the entry for `key`; no-op when absent.
    pub fn remove(&self, key: &K) {
        self.store.lock().remove(key);
    }

    // == Clear ==
    /// Removes all entries in one critical section.
    pub fn clear(&self) {
        self.store.lock().clear();
    }

    // == Fetch ==
    /// Returns the cached value for `key`, or runs `create`, stores its
    /// result and returns it.
    ///
    /// A failing `create` propagates its error and stores nothing.
    ///
    /// Concurrent fetches of the same missing key may each run `create`;
    /// whichever stores last is what stays cached.
    pub fn fetch<E, F>(&self, key: K, create: F) -> Result<V, E>
    where
        F: FnOnce(&K) -> Result<V, E>,
    {
        self.fetch_with_cost(key, 0, create)
    }

    /// Like [`fetch`](Self::fetch), charging `cost` for a newly created value.
    pub fn fetch_with_cost<E, F>(&self, key: K, cost: u64, create: F) -> Result<V, E>
    where
        F: FnOnce(&K) -> Result<V, E>,
    {
        let cached = self.store.lock().get(&key);
        if let Some(value) = cached {
            return Ok(value);
        }

        let value = create(&key)?;
        self.store.lock().set_with_cost(key, value.clone(), cost);
        Ok(value)
    }

    // == Limits ==
    pub fn count_limit(&self) -> usize {
        self.store.lock().count_limit()
    }

    /// Sets the count limit (0 = unbounded). Enforced on the next insert.
    pub fn set_count_limit(&self, limit: usize) {
        self.store.lock().set_count_limit(limit);
    }

    pub fn cost_limit(&self) -> u64 {
        self.store.lock().cost_limit()
    }

    /// Sets the cost limit (0 = unbounded). Enforced on the next insert.
    pub fn set_cost_limit(&self, limit: u64) {
        self.store.lock().set_cost_limit(limit);
    }

    // == Introspection ==
    pub fn contains(&self, key: &K) -> bool {
        self.store.lock().contains(key)
    }

    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }

    pub fn total_cost(&self) -> u64 {
        self.store.lock().total_cost()
    }

    /// Returns a snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.store.lock().stats()
    }
}

impl<K, V> Default for BoundedCache<K, V>
where
    K: Hash + Eq + Clone + Debug,
    V: Clone,
{
    fn default() -> Self {
        Self::unbounded()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_fetch_stores_created_value() {
        let cache: BoundedCache<&str, i32> = BoundedCache::unbounded();

        let value = cache.fetch("K1", |_| Ok::<_, Infallible>(15)).unwrap();

        assert_eq!(value, 15);
        assert_eq!(cache.get(&"K1"), Some(15));

        cache.clear();
        assert_eq!(cache.get(&"K1"), None);
    }

    #[test]
    fn test_fetch_hit_skips_create() {
        let cache: BoundedCache<u32, String> = BoundedCache::unbounded();
        cache.set(1, "stored".to_string());

        let value = cache
            .fetch(1, |_| -> Result<String, Infallible> { panic!("create must not run on a hit") })
            .unwrap();

        assert_eq!(value, "stored");
    }

    #[test]
    fn test_fetch_failure_is_not_cached() {
        let cache: BoundedCache<u32, u32> = BoundedCache::unbounded();

        let failed = cache.fetch(7, |_| Err("boom"));
        assert_eq!(failed, Err("boom"));
        assert!(!cache.contains(&7));

        let value = cache.fetch(7, |_| Ok::<_, &str>(49)).unwrap();
        assert_eq!(value, 49);
        assert_eq!(cache.get(&7), Some(49));
    }

    #[test]
    fn test_fetch_passes_key_to_create() {
        let cache: BoundedCache<u64, u64> = BoundedCache::unbounded();
        let value = cache.fetch(12, |k| Ok::<_, Infallible>(k * 2)).unwrap();
        assert_eq!(value, 24);
    }

    #[test]
    fn test_fetch_with_cost_charges_cost() {
        let cache: BoundedCache<u32, u32> = BoundedCache::new(0, 100);
        cache.fetch_with_cost(1, 30, |_| Ok::<_, Infallible>(1)).unwrap();
        assert_eq!(cache.total_cost(), 30);
    }

    #[test]
    fn test_max_cost_entry_does_not_break_later_inserts() {
        let cache: BoundedCache<u32, u32> = BoundedCache::new(0, 100);

        cache.set_with_cost(1, 1, u64::MAX);
        cache.set_with_cost(2, 2, 1);

        // The oversized entry is evicted by the next insert
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&2), Some(2));
        assert!(cache.total_cost() <= 100);

        let value = cache
            .fetch_with_cost(3, u64::MAX, |_| Ok::<_, Infallible>(3))
            .unwrap();
        assert_eq!(value, 3);
        cache.set_with_cost(4, 4, 10);
        assert_eq!(cache.get(&4), Some(4));
        assert_eq!(cache.stats().total_cost, cache.total_cost());
    }

    #[test]
    fn test_clear_is_atomic_for_readers() {
        const BATCH: u32 = 32;
        const COST: u64 = 3;

        let cache: Arc<BoundedCache<u32, u32>> = Arc::new(BoundedCache::unbounded());
        let done = Arc::new(AtomicBool::new(false));

        let writer = {
            let cache = Arc::clone(&cache);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                for _ in 0..500 {
                    for k in 0..BATCH {
                        cache.set_with_cost(k, k * 10, COST);
                    }
                    cache.clear();
                }
                done.store(true, Ordering::SeqCst);
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let done = Arc::clone(&done);
                thread::spawn(move || {
                    while !done.load(Ordering::SeqCst) {
                        let stats = cache.stats();
                        assert!(stats.total_entries <= BATCH as usize);
                        assert_eq!(stats.total_cost, stats.total_entries as u64 * COST);

                        for k in 0..BATCH {
                            match cache.get(&k) {
                                None => {}
                                Some(v) => assert_eq!(v, k * 10),
                            }
                        }
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }

        assert!(cache.is_empty());
        assert_eq!(cache.total_cost(), 0);
    }

    #[test]
    fn test_remove_missing_key_is_noop() {
        let cache: BoundedCache<u32, u32> = BoundedCache::unbounded();
        cache.set(1, 1);
        cache.remove(&2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_limits_are_adjustable() {
        let cache: BoundedCache<u32, u32> = BoundedCache::default();
        assert_eq!(cache.count_limit(), 0);
        assert_eq!(cache.cost_limit(), 0);

        cache.set_count_limit(10);
        cache.set_cost_limit(500);

        assert_eq!(cache.count_limit(), 10);
        assert_eq!(cache.cost_limit(), 500);
    }

    #[test]
    fn test_from_config() {
        let config = MemoConfig {
            count_limit: 4,
            cost_limit: 8,
        };
        let cache: BoundedCache<u32, u32> = BoundedCache::from_config(&config);
        assert_eq!(cache.count_limit(), 4);
        assert_eq!(cache.cost_limit(), 8);
    }

    #[test]
    fn test_create_runs_without_holding_lock() {
        let cache: BoundedCache<u32, u32> = BoundedCache::unbounded();

        let value = cache
            .fetch(1, |_| {
                // Re-entrant use of the same cache from inside create
                cache.set(2, 20);
                Ok::<_, Infallible>(cache.get(&2).unwrap_or_default() + 1)
            })
            .unwrap();

        assert_eq!(value, 21);
        assert_eq!(cache.get(&1), Some(21));
    }

    #[test]
    fn test_concurrent_fetch_returns_valid_values() {
        let cache: Arc<BoundedCache<u32, u32>> = Arc::new(BoundedCache::new(16, 0));
        let calls = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                thread::spawn(move || {
                    for k in 0..64u32 {
                        let v = cache
                            .fetch(k, |k| {
                                calls.fetch_add(1, Ordering::SeqCst);
                                Ok::<_, Infallible>(k * k)
                            })
                            .unwrap();
                        assert_eq!(v, k * k);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(cache.len() <= 16);
        assert!(calls.load(Ordering::SeqCst) >= 64);
    }
}
