//! Executor decorator that runs a fixed interceptor list around every task.

use std::sync::Arc;
use std::time::Duration;

use tenantry_core::{TaskConfig, TenantryResult};

use crate::chain::TaskInterceptorChain;
use crate::executor::{Task, TaskExecutor, TaskHandle, ValueTask};
use crate::interceptor::TaskInterceptor;
use crate::wrapper::{intercept_task, intercept_value_task};

/// Wraps every submitted task in the same interceptors.
///
/// The interceptor instances are shared by all tasks, including tasks that
/// run concurrently, so they must not keep per-execution state without
/// synchronising it. Use [`ContextPropagatingExecutor`](crate::ContextPropagatingExecutor)
/// for tenant propagation instead of sharing a `TenantContextInterceptor`.
pub struct InterceptingExecutor<E> {
    inner: E,
    chain: TaskInterceptorChain,
    config: TaskConfig,
}

impl<E: TaskExecutor> InterceptingExecutor<E> {
    pub fn new(inner: E, interceptors: Vec<Arc<dyn TaskInterceptor>>) -> Self {
        Self {
            inner,
            chain: TaskInterceptorChain::new(interceptors),
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

    pub fn chain(&self) -> &TaskInterceptorChain {
        &self.chain
    }
}

impl<E: TaskExecutor> TaskExecutor for InterceptingExecutor<E> {
    fn execute(&self, task: Task) -> TenantryResult<()> {
        let wrapped = intercept_task(task, self.chain.clone(), self.config.after_task_policy);
        self.inner.execute(wrapped)
    }

    fn execute_with_start_timeout(&self, task: Task, start_timeout: Duration) -> TenantryResult<()> {
        let wrapped = intercept_task(task, self.chain.clone(), self.config.after_task_policy);
        self.inner.execute_with_start_timeout(wrapped, start_timeout)
    }

    fn submit(&self, task: Task) -> TenantryResult<TaskHandle<()>> {
        let wrapped = intercept_task(task, self.chain.clone(), self.config.after_task_policy);
        self.inner.submit(wrapped)
    }

    fn submit_value<T>(&self, task: ValueTask<T>) -> TenantryResult<TaskHandle<T>>
    where
        T: Send + 'static,
    {
        let wrapped = intercept_value_task(task, self.chain.clone(), self.config.after_task_policy);
        self.inner.submit_value(wrapped)
    }
}
