//! Registry decorator that resolves cache names per tenant.

use tenantry_core::{is_blank, ContextError, ContextHolder, RegistryConfig, TenantryResult};

use crate::traits::CacheRegistry;

/// Joins a base cache name and a tenant.
pub const CACHE_NAME_SEPARATOR: char = '.';

/// Name of the tenant-specific cache for `name`.
///
/// Blank tenants leave the name unchanged. Nothing is escaped: base name
/// `"a.b"` with tenant `"c"` and base name `"a"` with tenant `"b.c"` both
/// resolve to `"a.b.c"`.
pub fn translate_cache_name(name: &str, tenant: Option<&str>) -> String {
    match tenant {
        Some(tenant) if !is_blank(Some(tenant)) => {
            format!("{name}{CACHE_NAME_SEPARATOR}{tenant}")
        }
        _ => name.to_string(),
    }
}

/// Hands out a separate cache per tenant by suffixing the requested name
/// with the current tenant.
#[derive(Debug)]
pub struct TenantScopedCacheRegistry<R> {
    delegate: R,
    context_required: bool,
}

impl<R> TenantScopedCacheRegistry<R> {
    pub fn new(delegate: R) -> Self {
        Self::with_context_required(delegate, false)
    }

    /// When `context_required` is set, lookups without a non-blank tenant fail.
    pub fn with_context_required(delegate: R, context_required: bool) -> Self {
        Self {
            delegate,
            context_required,
        }
    }

    pub fn from_config(delegate: R, config: &RegistryConfig) -> Self {
        Self::with_context_required(delegate, config.context_required)
    }

    pub fn is_context_required(&self) -> bool {
        self.context_required
    }

    pub fn delegate(&self) -> &R {
        &self.delegate
    }
}

impl<R: CacheRegistry> CacheRegistry for TenantScopedCacheRegistry<R> {
    type Cache = R::Cache;

    fn get_cache(&self, name: &str) -> TenantryResult<Option<Self::Cache>> {
        let tenant = ContextHolder::get();
        if self.context_required && is_blank(tenant.as_deref()) {
            return Err(ContextError::required("cache lookup").into());
        }
        let actual = translate_cache_name(name, tenant.as_deref());
        tracing::debug!(cache = name, resolved = %actual, "Resolved tenant cache name");
        self.delegate.get_cache(&actual)
    }

    /// Names known to the delegate, including tenant suffixes.
    fn cache_names(&self) -> TenantryResult<Vec<String>> {
        self.delegate.cache_names()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockCacheRegistry;
    use crate::traits::Cache;

    type Registry = TenantScopedCacheRegistry<MockCacheRegistry<u32, u32>>;

    fn registry(context_required: bool) -> Registry {
        TenantScopedCacheRegistry::with_context_required(MockCacheRegistry::new(), context_required)
    }

    #[test]
    fn test_translate_cache_name() {
        assert_eq!(translate_cache_name("foo", Some("context")), "foo.context");
        assert_eq!(translate_cache_name("foo", None), "foo");
        assert_eq!(translate_cache_name("foo", Some("")), "foo");
        assert_eq!(translate_cache_name("foo", Some("  ")), "foo");
    }

    #[test]
    fn test_cache_name_with_context() {
        let registry = registry(false);
        ContextHolder::set(Some("context".to_string()));

        let cache = registry.get_cache("foo").unwrap().expect("cache");
        assert_eq!(cache.name(), "foo.context");
    }

    #[test]
    fn test_cache_name_without_context() {
        let registry = registry(false);
        ContextHolder::set(None);

        let cache = registry.get_cache("foo").unwrap().expect("cache");
        assert_eq!(cache.name(), "foo");
    }

    #[test]
    fn test_blank_context_falls_back_to_base_name() {
        let registry = registry(false);
        ContextHolder::set(Some(" ".to_string()));

        let cache = registry.get_cache("foo").unwrap().expect("cache");
        assert_eq!(cache.name(), "foo");
    }

    #[test]
    fn test_failure_if_absent_context_and_context_required() {
        let registry = registry(true);
        ContextHolder::set(None);
        assert!(registry.get_cache("foo").unwrap_err().is_context_required());
    }

    #[test]
    fn test_failure_if_empty_or_whitespace_context_and_context_required() {
        let registry = registry(true);
        for tenant in ["", "   "] {
            ContextHolder::set(Some(tenant.to_string()));
            assert!(registry.get_cache("foo").unwrap_err().is_context_required());
        }
        assert!(registry.delegate().cache_names().unwrap().is_empty());
    }

    #[test]
    fn test_from_config() {
        let registry: Registry =
            TenantScopedCacheRegistry::from_config(MockCacheRegistry::new(), &RegistryConfig { context_required: true });
        assert!(registry.is_context_required());
        assert!(!TenantScopedCacheRegistry::new(MockCacheRegistry::<u32, u32>::new()).is_context_required());
    }

    #[test]
    fn test_cache_names_are_raw() {
        let registry = registry(false);
        ContextHolder::set(Some("a".to_string()));
        registry.get_cache("foo").unwrap();
        ContextHolder::set(Some("b".to_string()));
        registry.get_cache("foo").unwrap();
        ContextHolder::set(None);
        registry.get_cache("bar").unwrap();

        ContextHolder::set(Some("a".to_string()));
        assert_eq!(registry.cache_names().unwrap(), vec!["bar", "foo.a", "foo.b"]);
    }

    #[test]
    fn test_unknown_cache_in_static_registry() {
        let registry = TenantScopedCacheRegistry::new(MockCacheRegistry::<u32, u32>::with_caches(["foo.a"]));
        ContextHolder::set(Some("a".to_string()));
        assert!(registry.get_cache("foo").unwrap().is_some());
        ContextHolder::set(Some("b".to_string()));
        assert!(registry.get_cache("foo").unwrap().is_none());
    }

    #[test]
    fn test_dotted_names_can_collide() {
        let registry = registry(false);
        ContextHolder::set(Some("c".to_string()));
        let first = registry.get_cache("a.b").unwrap().expect("cache");
        ContextHolder::set(Some("b.c".to_string()));
        let second = registry.get_cache("a").unwrap().expect("cache");

        assert_eq!(first.name(), "a.b.c");
        assert!(std::sync::Arc::ptr_eq(&first, &second));
    }
}
