//! TENANTRY Cache - Tenant-Scoped Caching
//!
//! Two decorators over plain cache abstractions:
//!
//! - [`TenantScopedCache`] keeps one shared store but qualifies every key
//!   with the current tenant.
//! - [`TenantScopedCacheRegistry`] hands out a different cache per tenant
//!   by resolving `name` to `name.tenant`.
//!
//! Both read the tenant from [`tenantry_core::ContextHolder`] at the moment
//! of each call.

pub mod mock;
pub mod registry;
pub mod scoped;
pub mod tenant_key;
pub mod traits;

pub use mock::{MockCache, MockCacheRegistry};
pub use registry::{translate_cache_name, TenantScopedCacheRegistry, CACHE_NAME_SEPARATOR};
pub use scoped::TenantScopedCache;
pub use tenant_key::TenantKey;
pub use traits::{Cache, CacheRegistry};
