//! TENANTRY Core - Ambient Tenant Context
//!
//! Shared foundation for the other TENANTRY crates:
//! - [`ContextHolder`]: the calling thread's tenant identifier
//! - Error hierarchy rooted at [`TenantryError`]
//! - [`TenantryConfig`] loaded from TOML
//! - Tracing bootstrap for binaries and tests

pub mod config;
pub mod context;
pub mod error;
pub mod telemetry;

pub use config::{
    AfterTaskPolicy, CacheConfig, RegistryConfig, TaskConfig, TenantryConfig, CONFIG_ENV_VAR,
};
pub use context::{is_blank, ContextHolder, TenantContextGuard};
pub use error::{
    CacheError, ConfigError, ContextError, HookPhase, TaskError, TenantryError, TenantryResult,
};
pub use telemetry::{init_tracing, LogFormat};

/// Tenant identifier. `None` means no tenant is in scope.
pub type TenantId = Option<String>;
