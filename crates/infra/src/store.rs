//! Key/value persistence seam for the access-control collections.
//!
//! The platform runs on an embedded key-value engine; this trait is the
//! core's entire view of it. Five logical collections sit behind it:
//! permissions, roles, rolePermissions, userRoles and users.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};

use meridian_core::{DomainError, DomainResult};

/// Typed key/value collection.
///
/// The store guarantees per-operation exclusivity: a single `get`, `put` or
/// `remove` is atomic with respect to concurrent callers. Check-then-put
/// upserts in the components above rely on that, not on locking of their
/// own.
pub trait KeyValueStore<K, V>: Send + Sync {
    fn get(&self, key: &K) -> DomainResult<Option<V>>;
    fn put(&self, key: K, value: V) -> DomainResult<()>;
    /// Removing an absent key succeeds silently.
    fn remove(&self, key: &K) -> DomainResult<()>;
    /// Full collection scan; callers filter. Collections here are small
    /// (catalog-sized), not record-sized.
    fn all(&self) -> DomainResult<Vec<V>>;
}

impl<K, V, S> KeyValueStore<K, V> for Arc<S>
where
    S: KeyValueStore<K, V> + ?Sized,
{
    fn get(&self, key: &K) -> DomainResult<Option<V>> {
        (**self).get(key)
    }

    fn put(&self, key: K, value: V) -> DomainResult<()> {
        (**self).put(key, value)
    }

    fn remove(&self, key: &K) -> DomainResult<()> {
        (**self).remove(key)
    }

    fn all(&self) -> DomainResult<Vec<V>> {
        (**self).all()
    }
}

/// In-memory store for tests/dev and the embedded single-node deployment.
#[derive(Debug)]
pub struct InMemoryStore<K, V> {
    inner: RwLock<HashMap<K, V>>,
}

impl<K, V> InMemoryStore<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> Default for InMemoryStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> KeyValueStore<K, V> for InMemoryStore<K, V>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn get(&self, key: &K) -> DomainResult<Option<V>> {
        let map = self
            .inner
            .read()
            .map_err(|_| DomainError::upstream("store lock poisoned"))?;
        Ok(map.get(key).cloned())
    }

    fn put(&self, key: K, value: V) -> DomainResult<()> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| DomainError::upstream("store lock poisoned"))?;
        map.insert(key, value);
        Ok(())
    }

    fn remove(&self, key: &K) -> DomainResult<()> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| DomainError::upstream("store lock poisoned"))?;
        map.remove(key);
        Ok(())
    }

    fn all(&self) -> DomainResult<Vec<V>> {
        let map = self
            .inner
            .read()
            .map_err(|_| DomainError::upstream("store lock poisoned"))?;
        Ok(map.values().cloned().collect())
    }
}
