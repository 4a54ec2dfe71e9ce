//! Never-evicting concurrent cache

use std::hash::Hash;

use moka::future::Cache;

/// Concurrent map from lookup key to resolved value
///
/// Populated at most once per key and never evicted; entries live for the
/// process lifetime. Reads are lock-free and writes are internally
/// synchronized, so two concurrent misses on the same key may both fetch
/// and both insert; the values are derived from the same remote state, so
/// the last writer wins harmlessly.
pub struct KeyedCache<K, V> {
    inner: Cache<K, V>,
}

impl<K, V> KeyedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Create an empty cache with no capacity bound and no expiry
    pub fn new() -> Self {
        Self {
            inner: Cache::builder().build(),
        }
    }

    pub async fn get(&self, key: &K) -> Option<V> {
        self.inner.get(key).await
    }

    pub async fn insert(&self, key: K, value: V) {
        self.inner.insert(key, value).await
    }
}

impl<K, V> Default for KeyedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
