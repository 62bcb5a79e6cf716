//! Cache decorator that partitions a shared cache by tenant.

use std::fmt::Debug;

use tenantry_core::{is_blank, CacheConfig, ContextError, ContextHolder, TenantryResult};

use crate::tenant_key::TenantKey;
use crate::traits::Cache;

/// Rewrites every key into a [`TenantKey`] for the current tenant before
/// handing it to the delegate, so many tenants can share one store.
///
/// The delegate does the actual caching and decides whether it accepts
/// a given value; this type only translates keys.
///
/// # `clear` is not tenant-scoped
///
/// [`clear`](Cache::clear) is passed straight through and empties the whole
/// delegate, wiping every tenant's entries.
///
/// # Native cache
///
/// [`native_cache`](Cache::native_cache) exposes the delegate's store, whose
/// keys are `TenantKey`s rather than the keys callers passed in.
#[derive(Debug)]
pub struct TenantScopedCache<C> {
    delegate: C,
    context_required: bool,
}

impl<C> TenantScopedCache<C> {
    /// Wrap `delegate`. Operations without a tenant use the no-tenant partition.
    pub fn new(delegate: C) -> Self {
        Self::with_context_required(delegate, false)
    }

    /// Wrap `delegate`. When `context_required` is set, `get`, `put` and
    /// `evict` fail if no non-blank tenant is in scope.
    pub fn with_context_required(delegate: C, context_required: bool) -> Self {
        Self {
            delegate,
            context_required,
        }
    }

    pub fn from_config(delegate: C, config: &CacheConfig) -> Self {
        Self::with_context_required(delegate, config.context_required)
    }

    pub fn is_context_required(&self) -> bool {
        self.context_required
    }

    pub fn delegate(&self) -> &C {
        &self.delegate
    }

    fn translate_key<K: Clone + Debug>(&self, key: &K, operation: &str) -> TenantryResult<TenantKey<K>> {
        tracing::debug!(?key, "Translating key");
        let tenant = ContextHolder::get();
        if self.context_required && is_blank(tenant.as_deref()) {
            return Err(ContextError::required(operation).into());
        }
        let translated = TenantKey::new(tenant, key.clone());
        tracing::debug!(key = ?translated, "Translated key");
        Ok(translated)
    }
}

impl<K, V, C> Cache<K, V> for TenantScopedCache<C>
where
    C: Cache<TenantKey<K>, V>,
    K: Clone + Debug,
{
    type Native = C::Native;

    fn name(&self) -> &str {
        self.delegate.name()
    }

    fn native_cache(&self) -> &Self::Native {
        self.delegate.native_cache()
    }

    fn get(&self, key: &K) -> TenantryResult<Option<V>> {
        let translated = self.translate_key(key, "cache get")?;
        self.delegate.get(&translated)
    }

    fn put(&self, key: K, value: V) -> TenantryResult<()> {
        let translated = self.translate_key(&key, "cache put")?;
        self.delegate.put(translated, value)
    }

    fn evict(&self, key: &K) -> TenantryResult<()> {
        let translated = self.translate_key(key, "cache evict")?;
        self.delegate.evict(&translated)
    }

    fn clear(&self) -> TenantryResult<()> {
        self.delegate.clear()
    }
}
