//! Collection Projections
//!
//! Small pure computations over integer sequences, plus memoized call
//! sites that run them through a [`MemoCache`].

use crate::error::{MemoError, Result};
use crate::memo::{memoize, try_memoize, MemoCache, ProjectionId};

// == Projection Ids ==
pub const SUM: ProjectionId = ProjectionId::new("collections::sum");
pub const PRODUCT: ProjectionId = ProjectionId::new("collections::product");
pub const SORTED: ProjectionId = ProjectionId::new("collections::sorted");
pub const PRIMES: ProjectionId = ProjectionId::new("collections::primes");
pub const FIRST: ProjectionId = ProjectionId::new("collections::first");
pub const LAST: ProjectionId = ProjectionId::new("collections::last");

// == Plain Projections ==
pub fn sum(values: &[i64]) -> i64 {
    values.iter().sum()
}

pub fn product(values: &[i64]) -> i64 {
    values.iter().product()
}

pub fn sorted<T: Ord + Clone>(values: &[T]) -> Vec<T> {
    let mut sorted = values.to_vec();
    sorted.sort();
    sorted
}

/// Trial division over odd candidates up to the square root.
pub fn is_prime(n: i64) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    !has_odd_divisor_from(n, 3)
}

/// True if an odd divisor `d` with `start <= d <= sqrt(n)` divides `n`.
/// Compares by division so candidates near `sqrt(i64::MAX)` cannot overflow.
fn has_odd_divisor_from(n: i64, start: i64) -> bool {
    let mut divisor = start;
    while divisor <= n / divisor {
        if n % divisor == 0 {
            return true;
        }
        divisor += 2;
    }
    false
}

/// Keeps the prime elements, in their original order.
pub fn primes(values: &[i64]) -> Vec<i64> {
    values.iter().copied().filter(|&n| is_prime(n)).collect()
}

pub fn first<T: Clone>(values: &[T]) -> Result<T> {
    values.first().cloned().ok_or_else(|| MemoError::empty("first"))
}

pub fn last<T: Clone>(values: &[T]) -> Result<T> {
    values.last().cloned().ok_or_else(|| MemoError::empty("last"))
}

// == Memoized Call Sites ==
// These take `&Vec<i64>` rather than a slice: the subject is cloned into the
// cache key, so it has to be an owned, hashable value.

#[allow(clippy::ptr_arg)]
pub fn memoized_sum(values: &Vec<i64>, cache: Option<&MemoCache>) -> i64 {
    memoize(values, SUM, cache, |v| sum(v))
}

#[allow(clippy::ptr_arg)]
pub fn memoized_product(values: &Vec<i64>, cache: Option<&MemoCache>) -> i64 {
    memoize(values, PRODUCT, cache, |v| product(v))
}

#[allow(clippy::ptr_arg)]
pub fn memoized_sorted(values: &Vec<i64>, cache: Option<&MemoCache>) -> Vec<i64> {
    memoize(values, SORTED, cache, |v| sorted(v))
}

#[allow(clippy::ptr_arg)]
pub fn memoized_primes(values: &Vec<i64>, cache: Option<&MemoCache>) -> Vec<i64> {
    memoize(values, PRIMES, cache, |v| primes(v))
}

/// Failures are returned to the caller and never cached.
#[allow(clippy::ptr_arg)]
pub fn memoized_first(values: &Vec<i64>, cache: Option<&MemoCache>) -> Result<i64> {
    try_memoize(values, FIRST, cache, |v| first(v))
}

#[allow(clippy::ptr_arg)]
pub fn memoized_last(values: &Vec<i64>, cache: Option<&MemoCache>) -> Result<i64> {
    try_memoize(values, LAST, cache, |v| last(v))
}
