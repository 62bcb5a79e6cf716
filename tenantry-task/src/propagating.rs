//! Executor decorator that carries the submitter's tenant onto the worker.

use std::sync::Arc;
use std::time::Duration;

use tenantry_core::{ContextHolder, TaskConfig, TenantryResult};

use crate::chain::TaskInterceptorChain;
use crate::executor::{Task, TaskExecutor, TaskHandle, ValueTask};
use crate::interceptor::{TaskInterceptor, TenantContextInterceptor};
use crate::wrapper::{intercept_task, intercept_value_task};

/// Submits work so that it runs under the tenant that was current on the
/// submitting thread at submission time.
///
/// Each submission builds a fresh [`TenantContextInterceptor`], so the
/// worker's own tenant is put back once the task is done and back-to-back
/// tasks on a reused worker never see each other's tenant.
///
/// Caller-supplied interceptors run inside the tenant context: the context
/// interceptor is first in the chain, so it is set up before and torn down
/// after all of them.
pub struct ContextPropagatingExecutor<E> {
    inner: E,
    interceptors: Vec<Arc<dyn TaskInterceptor>>,
    config: TaskConfig,
}

impl<E: TaskExecutor> ContextPropagatingExecutor<E> {
    pub fn new(inner: E) -> Self {
        Self::with_interceptors(inner, Vec::new())
    }

    /// Also run `interceptors`, in order, inside the tenant context.
    pub fn with_interceptors(inner: E, interceptors: Vec<Arc<dyn TaskInterceptor>>) -> Self {
        Self {
            inner,
            interceptors,
            config: TaskConfig::default(),
        }
    }

    pub fn with_config(mut self, config: TaskConfig) -> Self {
        self.config = config;
        self
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    pub fn config(&self) -> &TaskConfig {
        &self.config
    }

    fn build_chain(&self) -> TaskInterceptorChain {
        let tenant = ContextHolder::get();
        tracing::debug!(tenant = ?tenant, "Capturing tenant context for task");
        let context: Arc<dyn TaskInterceptor> = Arc::new(TenantContextInterceptor::new(tenant));
        TaskInterceptorChain::new(
            std::iter::once(context).chain(self.interceptors.iter().cloned()),
        )
    }

    fn wrap(&self, task: Task) -> Task {
        intercept_task(task, self.build_chain(), self.config.after_task_policy)
    }

    fn wrap_value<T: Send + 'static>(&self, task: ValueTask<T>) -> ValueTask<T> {
        intercept_value_task(task, self.build_chain(), self.config.after_task_policy)
    }
}

impl<E: TaskExecutor> TaskExecutor for ContextPropagatingExecutor<E> {
    fn execute(&self, task: Task) -> TenantryResult<()> {
        self.inner.execute(self.wrap(task))
    }

    fn execute_with_start_timeout(&self, task: Task, start_timeout: Duration) -> TenantryResult<()> {
        self.inner
            .execute_with_start_timeout(self.wrap(task), start_timeout)
    }

    fn submit(&self, task: Task) -> TenantryResult<TaskHandle<()>> {
        self.inner.submit(self.wrap(task))
    }

    fn submit_value<T>(&self, task: ValueTask<T>) -> TenantryResult<TaskHandle<T>>
    where
        T: Send + 'static,
    {
        self.inner.submit_value(self.wrap_value(task))
    }
}
