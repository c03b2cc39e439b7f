//! Memoization Facade
//!
//! Turns a (subject, projection) pair into a [`CacheKey`] and runs
//! fetch-or-create against a chosen cache, or bypasses caching entirely.

use std::any::{type_name, Any};
use std::convert::Infallible;
use std::hash::Hash;
use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing::{debug, warn};

use crate::cache::BoundedCache;
use crate::config::MemoConfig;
use crate::memo::{ByAddress, CacheKey, ProjectionId};

/// Type-erased cached result. Cloning only bumps a reference count.
pub type CachedValue = Arc<dyn Any + Send + Sync>;

/// Cache holding memoized results of any type.
pub type MemoCache = BoundedCache<CacheKey, CachedValue>;

// == Shared Cache ==
static SHARED_CACHE: Lazy<MemoCache> = Lazy::new(|| {
    let config = MemoConfig::from_env();
    debug!(
        count_limit = config.count_limit,
        cost_limit = config.cost_limit,
        "shared memo cache initialized"
    );
    MemoCache::from_config(&config)
});

/// Returns the process-wide default cache.
///
/// Built on first use with limits from [`MemoConfig::from_env`] and never
/// dropped. It is shared by every thread, so tests that rely on it should
/// serialize and call `shared_cache().clear()` between runs.
pub fn shared_cache() -> &'static MemoCache {
    &SHARED_CACHE
}

// == Memoize ==
/// Returns `projection(subject)`, served from `cache` when possible.
///
/// With `cache == None` the projection is evaluated directly every time.
/// Otherwise the result is stored under `(subject, projection_id)` and
/// later calls with an equal subject and the same id reuse it.
///
/// The projection must be deterministic and free of side effects; nothing
/// checks that. A non-deterministic projection returns whatever it
/// produced first for as long as the entry stays cached.
pub fn memoize<S, T, F>(
    subject: &S,
    projection_id: impl Into<ProjectionId>,
    cache: Option<&MemoCache>,
    projection: F,
) -> T
where
    S: Hash + Eq + Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
    F: Fn(&S) -> T,
{
    let result = try_memoize(subject, projection_id, cache, |subject| {
        Ok::<_, Infallible>(projection(subject))
    });
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

// == Try Memoize ==
/// Fallible form of [`memoize`].
///
/// An error from `projection` is returned as-is and nothing is cached, so
/// the next call runs the projection again.
pub fn try_memoize<S, T, E, F>(
    subject: &S,
    projection_id: impl Into<ProjectionId>,
    cache: Option<&MemoCache>,
    projection: F,
) -> Result<T, E>
where
    S: Hash + Eq + Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
    F: Fn(&S) -> Result<T, E>,
{
    let Some(cache) = cache else {
        return projection(subject);
    };

    let key = CacheKey::new(subject.clone(), projection_id);
    let stored = cache.fetch(key.clone(), |_| {
        projection(subject).map(|value| Arc::new(value) as CachedValue)
    })?;

    if let Some(value) = stored.downcast_ref::<T>() {
        return Ok(value.clone());
    }

    // Same key was used earlier with another result type.
    warn!(
        ?key,
        expected = type_name::<T>(),
        "cached result has a different type, recomputing"
    );
    let value = projection(subject)?;
    cache.set(key, Arc::new(value.clone()));
    Ok(value)
}

// == Memoize By Address ==
/// Memoizes a projection of a shared reference, keyed by pointer identity
/// rather than by value.
///
/// Two `Arc`s holding equal values get separate entries, and an `Arc`
/// whose contents change through interior mutability keeps returning the
/// old result. The cache keeps the `Arc` alive until its entry goes away.
#[deprecated(note = "memoizes by reference identity, not by value; prefer `memoize` on a value subject")]
pub fn memoize_by_address<U, T, F>(
    subject: &Arc<U>,
    projection_id: impl Into<ProjectionId>,
    cache: Option<&MemoCache>,
    projection: F,
) -> T
where
    U: ?Sized + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
    F: Fn(&U) -> T,
{
    memoize(
        &ByAddress(Arc::clone(subject)),
        projection_id,
        cache,
        |subject| projection(&*subject.0),
    )
}

// == Memoized ==
/// Method-call sugar over [`memoize`] for any hashable value.
///
/// ```ignore
/// let total: i64 = vec![1, 2, 3].memoized("sum", |v| v.iter().sum());
/// ```
pub trait Memoized: Hash + Eq + Clone + Send + Sync + 'static {
    /// Memoizes `projection` of `self` in the shared cache.
    fn memoized<T, F>(&self, projection_id: impl Into<ProjectionId>, projection: F) -> T
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(&Self) -> T,
    {
        memoize(self, projection_id, Some(shared_cache()), projection)
    }

    /// Memoizes `projection` of `self` in `cache`, or evaluates it directly
    /// when `cache` is `None`.
    fn memoized_in<T, F>(
        &self,
        cache: Option<&MemoCache>,
        projection_id: impl Into<ProjectionId>,
        projection: F,
    ) -> T
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(&Self) -> T,
    {
        memoize(self, projection_id, cache, projection)
    }

    /// Fallible [`memoized`](Memoized::memoized).
    fn try_memoized<T, E, F>(
        &self,
        projection_id: impl Into<ProjectionId>,
        projection: F,
    ) -> Result<T, E>
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(&Self) -> Result<T, E>,
    {
        try_memoize(self, projection_id, Some(shared_cache()), projection)
    }
}

impl<S> Memoized for S where S: Hash + Eq + Clone + Send + Sync + 'static {}
