//! Error types for memoized computations
//!
//! The cache itself never fails; these are the failures of the bundled
//! projections, propagated unchanged through `try_memoize`.

use thiserror::Error;

// == Memo Error Enum ==
/// Failures of the bundled collection and JSON projections.
#[derive(Error, Debug)]
pub enum MemoError {
    /// The operation needs at least one element
    #[error("{operation} of an empty collection")]
    EmptyInput { operation: &'static str },

    /// JSON encoding failed
    #[error("JSON encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

impl MemoError {
    pub fn empty(operation: &'static str) -> Self {
        MemoError::EmptyInput { operation }
    }
}

// == Result Type Alias ==
/// Convenience Result type for fallible projections.
pub type Result<T> = std::result::Result<T, MemoError>;
