//! Read-through entity cache
//!
//! The services in front of the remote lookup ports cache their results keyed
//! by entity id (claims additionally by claim type). The cache is an explicit
//! injected interface so the read-your-writes guarantee is a testable
//! contract: every successful write through a service invalidates the entry
//! for that id before the call returns.
//!
//! An entry records either a found value or a confirmed not-found. Transient
//! remote failures are never cached; only a definite answer from the remote
//! service is.

use dashmap::DashMap;
use std::hash::Hash;

/// A cached lookup outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEntry<V> {
    /// The remote service returned this value
    Found(V),
    /// The remote service confirmed the entity does not exist
    Missing,
}

impl<V> CacheEntry<V> {
    /// Converts the entry into the option the service layer returns
    pub fn into_option(self) -> Option<V> {
        match self {
            CacheEntry::Found(value) => Some(value),
            CacheEntry::Missing => None,
        }
    }

    /// Returns true when the entry records a confirmed not-found
    pub fn is_missing(&self) -> bool {
        matches!(self, CacheEntry::Missing)
    }
}

impl<V> From<Option<V>> for CacheEntry<V> {
    fn from(value: Option<V>) -> Self {
        match value {
            Some(v) => CacheEntry::Found(v),
            None => CacheEntry::Missing,
        }
    }
}

/// Cache contract injected into the lookup services
///
/// ```rust
/// use core_kernel::cache::{CacheEntry, EntityCache, InMemoryCache};
///
/// let cache: InMemoryCache<i64, String> = InMemoryCache::new();
/// cache.put(7, CacheEntry::Found("hello".to_string()));
/// assert_eq!(cache.get(&7), Some(CacheEntry::Found("hello".to_string())));
/// cache.invalidate(&7);
/// assert_eq!(cache.get(&7), None);
/// ```
pub trait EntityCache<K, V>: Send + Sync {
    /// Returns the cached entry for the key, if one is recorded
    fn get(&self, key: &K) -> Option<CacheEntry<V>>;

    /// Records an entry for the key, replacing any previous one
    fn put(&self, key: K, entry: CacheEntry<V>);

    /// Removes the entry for the key
    ///
    /// Called after every successful mutating operation on the keyed entity.
    fn invalidate(&self, key: &K);
}

/// Concurrent in-memory cache backed by a sharded map
///
/// Reads and writes may race freely across worker tasks; per-key consistency
/// comes from the underlying map's per-shard locking, which is sufficient for
/// the write-then-invalidate sequence the services perform.
#[derive(Debug)]
pub struct InMemoryCache<K, V>
where
    K: Eq + Hash,
{
    entries: DashMap<K, CacheEntry<V>>,
}

impl<K, V> InMemoryCache<K, V>
where
    K: Eq + Hash,
{
    /// Creates an empty cache
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Number of recorded entries (found and missing alike)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> Default for InMemoryCache<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> EntityCache<K, V> for InMemoryCache<K, V>
where
    K: Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    fn get(&self, key: &K) -> Option<CacheEntry<V>> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    fn put(&self, key: K, entry: CacheEntry<V>) {
        self.entries.insert(key, entry);
    }

    fn invalidate(&self, key: &K) {
        self.entries.remove(key);
    }
}
