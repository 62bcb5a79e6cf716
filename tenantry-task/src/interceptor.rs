//! Task interceptors: hooks that run around a unit of work.

use std::sync::Mutex;

use tenantry_core::{ContextHolder, TaskError, TenantryResult};

/// Work to be done before and after a task executes.
///
/// Both hooks run synchronously on the thread that executes the task.
/// Instances may be shared across tasks (see `InterceptingExecutor`), so
/// any per-execution state needs its own synchronisation.
pub trait TaskInterceptor: Send + Sync {
    /// Name used in log output.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn before_execution(&self) -> TenantryResult<()>;

    fn after_execution(&self) -> TenantryResult<()>;
}

/// Installs a tenant into [`ContextHolder`] for the duration of a task and
/// puts back whatever the executing thread had bound before.
///
/// # Not reusable across overlapping executions
///
/// The previously bound tenant is kept in a single slot on the instance.
/// Two executions sharing an instance would overwrite each other's saved
/// value, so create one interceptor per submitted task.
#[derive(Debug)]
pub struct TenantContextInterceptor {
    tenant: Option<String>,
    saved: Mutex<Option<String>>,
}

impl TenantContextInterceptor {
    /// Create an interceptor that installs `tenant`. `None` runs the task
    /// with no tenant in scope.
    pub fn new(tenant: Option<String>) -> Self {
        Self {
            tenant,
            saved: Mutex::new(None),
        }
    }

    /// Create an interceptor bound to the calling thread's current tenant.
    pub fn capture_current() -> Self {
        Self::new(ContextHolder::get())
    }

    /// The tenant this interceptor installs.
    pub fn tenant(&self) -> Option<&str> {
        self.tenant.as_deref()
    }
}

impl TaskInterceptor for TenantContextInterceptor {
    fn name(&self) -> &str {
        "tenant-context"
    }

    fn before_execution(&self) -> TenantryResult<()> {
        let original = ContextHolder::get();
        tracing::debug!(current = ?original, tenant = ?self.tenant, "Setting tenant context");
        *self
            .saved
            .lock()
            .map_err(|_| TaskError::InterceptorStatePoisoned)? = original;
        ContextHolder::set(self.tenant.clone());
        Ok(())
    }

    fn after_execution(&self) -> TenantryResult<()> {
        let original = self
            .saved
            .lock()
            .map_err(|_| TaskError::InterceptorStatePoisoned)?
            .clone();
        tracing::debug!(tenant = ?original, "Resetting tenant context");
        ContextHolder::set(original);
        Ok(())
    }
}
