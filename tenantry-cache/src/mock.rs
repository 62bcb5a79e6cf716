//! In-memory cache and registry for testing.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};

use tenantry_core::{CacheError, TenantryResult};

use crate::traits::{Cache, CacheRegistry};

/// In-memory mock cache backed by a `HashMap`.
#[derive(Debug)]
pub struct MockCache<K, V> {
    name: String,
    entries: RwLock<HashMap<K, V>>,
}

impl<K, V> MockCache<K, V> {
    /// Create a new empty cache.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Get count of stored entries.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn poisoned(&self) -> CacheError {
        CacheError::LockPoisoned {
            cache: self.name.clone(),
        }
    }
}

impl<K, V> Cache<K, V> for MockCache<K, V>
where
    K: Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    type Native = RwLock<HashMap<K, V>>;

    fn name(&self) -> &str {
        &self.name
    }

    fn native_cache(&self) -> &Self::Native {
        &self.entries
    }

    fn get(&self, key: &K) -> TenantryResult<Option<V>> {
        let entries = self.entries.read().map_err(|_| self.poisoned())?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: K, value: V) -> TenantryResult<()> {
        let mut entries = self.entries.write().map_err(|_| self.poisoned())?;
        entries.insert(key, value);
        Ok(())
    }

    fn evict(&self, key: &K) -> TenantryResult<()> {
        let mut entries = self.entries.write().map_err(|_| self.poisoned())?;
        entries.remove(key);
        Ok(())
    }

    fn clear(&self) -> TenantryResult<()> {
        let mut entries = self.entries.write().map_err(|_| self.poisoned())?;
        entries.clear();
        Ok(())
    }
}

/// In-memory registry of [`MockCache`]s.
///
/// A dynamic registry creates a cache the first time a name is requested;
/// a static one only knows the names it was built with.
#[derive(Debug)]
pub struct MockCacheRegistry<K, V> {
    caches: RwLock<HashMap<String, Arc<MockCache<K, V>>>>,
    dynamic: bool,
}

impl<K, V> Default for MockCacheRegistry<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> MockCacheRegistry<K, V> {
    /// Create a registry that creates caches on demand.
    pub fn new() -> Self {
        Self {
            caches: RwLock::new(HashMap::new()),
            dynamic: true,
        }
    }

    /// Create a registry with a fixed set of caches.
    pub fn with_caches<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let caches = names
            .into_iter()
            .map(|name| {
                let name = name.into();
                (name.clone(), Arc::new(MockCache::new(name)))
            })
            .collect();
        Self {
            caches: RwLock::new(caches),
            dynamic: false,
        }
    }

    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }
}

fn registry_poisoned() -> CacheError {
    CacheError::LockPoisoned {
        cache: "registry".to_string(),
    }
}

impl<K, V> CacheRegistry for MockCacheRegistry<K, V>
where
    K: Send + Sync,
    V: Send + Sync,
{
    type Cache = Arc<MockCache<K, V>>;

    fn get_cache(&self, name: &str) -> TenantryResult<Option<Self::Cache>> {
        {
            let caches = self.caches.read().map_err(|_| registry_poisoned())?;
            if let Some(cache) = caches.get(name) {
                return Ok(Some(Arc::clone(cache)));
            }
        }
        if !self.dynamic {
            return Ok(None);
        }

        let mut caches = self.caches.write().map_err(|_| registry_poisoned())?;
        let cache = caches
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(MockCache::new(name)));
        Ok(Some(Arc::clone(cache)))
    }

    fn cache_names(&self) -> TenantryResult<Vec<String>> {
        let caches = self.caches.read().map_err(|_| registry_poisoned())?;
        let mut names: Vec<String> = caches.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}
