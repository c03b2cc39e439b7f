//! Configuration Module
//!
//! Loads the limits of the shared memoization cache from environment variables.

use std::env;

/// Limits applied to a cache built from configuration.
///
/// A limit of 0 means unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MemoConfig {
    /// Maximum number of cached entries
    pub count_limit: usize,
    /// Maximum aggregate cost of cached entries
    pub cost_limit: u64,
}

impl MemoConfig {
    /// Creates a new MemoConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MEMO_COUNT_LIMIT` - Maximum cache entries (default: 0, unbounded)
    /// - `MEMO_COST_LIMIT` - Maximum aggregate cost (default: 0, unbounded)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        Self {
            count_limit: env::var("MEMO_COUNT_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            cost_limit: env::var("MEMO_COST_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
        }
    }
}
