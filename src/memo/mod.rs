//! Memoization Module
//!
//! Key construction and the fetch-or-create facade used to memoize pure
//! projections of hashable values.

mod facade;
mod key;

pub use key::{ByAddress, CacheKey, ProjectionId, Subject};
#[allow(deprecated)]
pub use facade::memoize_by_address;
pub use facade::{memoize, shared_cache, try_memoize, CachedValue, MemoCache, Memoized};
