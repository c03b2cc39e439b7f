//! Cache Module
//!
//! Provides a generic, thread-safe bounded cache with count/cost limits and
//! an atomic-in-intent fetch-or-create.

mod bounded;
mod entry;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use bounded::BoundedCache;
pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::CacheStore;
