//! Cache and cache registry traits.
//!
//! These are the seams the tenant-scoping decorators sit on. Storage,
//! eviction policy and serialization belong to the implementations.

use std::sync::Arc;

use tenantry_core::TenantryResult;

/// A named key/value cache.
///
/// Implementations should be thread-safe and support concurrent access.
///
/// # Absent versus cached "nothing"
///
/// `get` returns `None` for a miss. Callers that need to cache the absence
/// of a value choose `V = Option<T>`, so a hit on a stored `None` comes back
/// as `Some(None)`.
pub trait Cache<K, V>: Send + Sync {
    /// The underlying store handed out by [`native_cache`](Self::native_cache).
    type Native: ?Sized;

    fn name(&self) -> &str;

    /// The underlying store. Decorators may have rewritten the keys inside it.
    fn native_cache(&self) -> &Self::Native;

    fn get(&self, key: &K) -> TenantryResult<Option<V>>;

    fn put(&self, key: K, value: V) -> TenantryResult<()>;

    fn evict(&self, key: &K) -> TenantryResult<()>;

    /// Remove every entry.
    fn clear(&self) -> TenantryResult<()>;
}

impl<K, V, C> Cache<K, V> for Arc<C>
where
    C: Cache<K, V> + ?Sized,
{
    type Native = C::Native;

    fn name(&self) -> &str {
        (**self).name()
    }

    fn native_cache(&self) -> &Self::Native {
        (**self).native_cache()
    }

    fn get(&self, key: &K) -> TenantryResult<Option<V>> {
        (**self).get(key)
    }

    fn put(&self, key: K, value: V) -> TenantryResult<()> {
        (**self).put(key, value)
    }

    fn evict(&self, key: &K) -> TenantryResult<()> {
        (**self).evict(key)
    }

    fn clear(&self) -> TenantryResult<()> {
        (**self).clear()
    }
}

/// Looks up caches by name.
pub trait CacheRegistry: Send + Sync {
    /// Handle type for the caches this registry hands out.
    type Cache;

    /// The cache called `name`, or `None` if the registry has no such cache
    /// and does not create caches on demand.
    fn get_cache(&self, name: &str) -> TenantryResult<Option<Self::Cache>>;

    /// Names of the caches this registry currently knows about.
    fn cache_names(&self) -> TenantryResult<Vec<String>>;
}
