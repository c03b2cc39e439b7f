//! JSON Helpers
//!
//! Encodes values with serde_json, optionally memoizing the encoding of a
//! subject.

use std::hash::Hash;

use serde::Serialize;

use crate::error::Result;
use crate::memo::{try_memoize, MemoCache, ProjectionId};

pub const ENCODE: ProjectionId = ProjectionId::new("json::encode");
pub const ENCODE_PRETTY: ProjectionId = ProjectionId::new("json::encode_pretty");

/// Encodes `value` as compact JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Encodes `value` as indented JSON.
pub fn to_json_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Compact JSON encoding of `subject`, memoized in `cache`.
pub fn memoized_json<S>(subject: &S, cache: Option<&MemoCache>) -> Result<String>
where
    S: Serialize + Hash + Eq + Clone + Send + Sync + 'static,
{
    try_memoize(subject, ENCODE, cache, |s| to_json(s))
}

/// Indented JSON encoding of `subject`, memoized in `cache`.
pub fn memoized_json_pretty<S>(subject: &S, cache: Option<&MemoCache>) -> Result<String>
where
    S: Serialize + Hash + Eq + Clone + Send + Sync + 'static,
{
    try_memoize(subject, ENCODE_PRETTY, cache, |s| to_json_pretty(s))
}
