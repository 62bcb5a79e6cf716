//! Ordered composition of task interceptors.

use std::fmt;
use std::sync::Arc;

use tenantry_core::TenantryResult;

use crate::interceptor::TaskInterceptor;

/// Runs before-hooks first to last and after-hooks last to first, so the
/// first interceptor to set something up is the last to tear it down.
///
/// A failing hook stops its pass immediately. A failed before-pass does not
/// unwind the interceptors that already ran.
#[derive(Clone, Default)]
pub struct TaskInterceptorChain {
    interceptors: Vec<Arc<dyn TaskInterceptor>>,
}

impl TaskInterceptorChain {
    /// Build a chain from an ordered sequence. The sequence is copied.
    pub fn new<I>(interceptors: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn TaskInterceptor>>,
    {
        Self {
            interceptors: interceptors.into_iter().collect(),
        }
    }

    /// A chain with no interceptors.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    pub fn apply_before_task(&self) -> TenantryResult<()> {
        for interceptor in &self.interceptors {
            tracing::trace!(interceptor = interceptor.name(), "Invoking before-task interceptor");
            interceptor.before_execution()?;
        }
        Ok(())
    }

    pub fn apply_after_task(&self) -> TenantryResult<()> {
        for interceptor in self.interceptors.iter().rev() {
            tracing::trace!(interceptor = interceptor.name(), "Invoking after-task interceptor");
            interceptor.after_execution()?;
        }
        Ok(())
    }
}

impl fmt::Debug for TaskInterceptorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.interceptors.iter().map(|i| i.name()))
            .finish()
    }
}
