//! Memoization Key Module
//!
//! Builds cache keys from a type-erased subject and a projection tag.

use std::any::{type_name, Any, TypeId};
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

// == Projection Id ==
/// Stable tag naming which projection of a subject is cached.
///
/// Each distinct projection applied to the same subject type needs its own
/// tag; reusing a tag for two different projections makes them share
/// results.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectionId(Cow<'static, str>);

impl ProjectionId {
    /// Creates a tag from a static name. Usable in `const` items.
    pub const fn new(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for ProjectionId {
    fn from(name: &'static str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ProjectionId {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

impl From<&ProjectionId> for ProjectionId {
    fn from(id: &ProjectionId) -> Self {
        id.clone()
    }
}

impl fmt::Display for ProjectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// == Subject ==
/// Object-safe view of a hashable, comparable value.
///
/// Implemented for every `Hash + Eq` type; values of different concrete
/// types never compare equal.
pub trait Subject: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn dyn_eq(&self, other: &dyn Subject) -> bool;
    fn dyn_hash(&self, state: &mut dyn Hasher);
}

impl<T> Subject for T
where
    T: Any + Hash + Eq + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn Subject) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .map_or(false, |other| self == other)
    }

    fn dyn_hash(&self, mut state: &mut dyn Hasher) {
        TypeId::of::<T>().hash(&mut state);
        self.hash(&mut state);
    }
}

// == Cache Key ==
/// Composite of a subject's value identity and a projection tag.
///
/// Two keys are equal iff their subjects are equal (same type, equal
/// values) and their projection tags are equal.
#[derive(Clone)]
pub struct CacheKey {
    subject: Arc<dyn Subject>,
    subject_type: &'static str,
    projection: ProjectionId,
}

impl CacheKey {
    // == Constructor ==
    /// Creates a key for `projection` applied to `subject`.
    pub fn new<S>(subject: S, projection: impl Into<ProjectionId>) -> Self
    where
        S: Hash + Eq + Send + Sync + 'static,
    {
        Self {
            subject: Arc::new(subject),
            subject_type: type_name::<S>(),
            projection: projection.into(),
        }
    }

    pub fn projection(&self) -> &ProjectionId {
        &self.projection
    }

    /// Returns the subject if it is an `S`.
    pub fn subject<S: 'static>(&self) -> Option<&S> {
        self.subject.as_any().downcast_ref::<S>()
    }
}

impl PartialEq for CacheKey {
    fn eq(&self, other: &Self) -> bool {
        self.projection == other.projection && self.subject.dyn_eq(other.subject.as_ref())
    }
}

impl Eq for CacheKey {}

impl Hash for CacheKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.subject.dyn_hash(state);
        self.projection.hash(state);
    }
}

impl fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheKey")
            .field("subject", &self.subject_type)
            .field("projection", &self.projection.as_str())
            .finish()
    }
}

// == By Address ==
/// Wraps a shared reference so it hashes and compares by pointer identity.
///
/// The wrapped `Arc` stays alive for as long as any key holds it, so an
/// address cannot be reused while it is cached.
pub struct ByAddress<T: ?Sized>(pub Arc<T>);

impl<T: ?Sized> ByAddress<T> {
    fn addr(&self) -> usize {
        Arc::as_ptr(&self.0).cast::<()>() as usize
    }
}

impl<T: ?Sized> Clone for ByAddress<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: ?Sized> PartialEq for ByAddress<T> {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl<T: ?Sized> Eq for ByAddress<T> {}

impl<T: ?Sized> Hash for ByAddress<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}
