//! Cache Entry Module
//!
//! Defines the holder for a single stored value and the cost charged for it.

// == Cache Entry ==
/// Represents a single cache entry: the stored value and its cost.
///
/// The store owns every entry exclusively. Readers only ever receive a
/// clone of `value`, never the entry itself.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Cost charged against the store's cost limit (0 = free)
    pub cost: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `cost` - Cost charged against the cost limit
    pub fn new(value: V, cost: u64) -> Self {
        Self { value, cost }
    }
}

impl<V: Clone> CacheEntry<V> {
    /// Returns a copy of the stored value.
    pub fn value(&self) -> V {
        self.value.clone()
    }
}
