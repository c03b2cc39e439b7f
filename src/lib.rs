//! Memo Cache - transparent memoization of pure projections
//!
//! Provides a thread-safe bounded cache with count/cost eviction and a
//! facade that caches `projection(subject)` per (subject, projection id).

pub mod cache;
pub mod collections;
pub mod config;
pub mod error;
pub mod json;
pub mod memo;

pub use cache::{BoundedCache, CacheStats};
pub use config::MemoConfig;
pub use error::{MemoError, Result};
pub use memo::{
    memoize, shared_cache, try_memoize, CacheKey, CachedValue, MemoCache, Memoized, ProjectionId,
};
