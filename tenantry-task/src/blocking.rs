//! [`TaskExecutor`] adapter over tokio's blocking thread pool.
//!
//! Blocking-pool threads are reused across tasks, which is exactly the case
//! where tenant context leaks unless every task restores it. Wrap this in a
//! [`ContextPropagatingExecutor`](crate::ContextPropagatingExecutor).

use std::time::{Duration, Instant};

use tenantry_core::{TaskError, TenantryResult};
use tokio::runtime::Handle;

use crate::executor::{run_catching, task_handle, Task, TaskExecutor, TaskHandle, ValueTask};

/// Runs tasks with [`Handle::spawn_blocking`].
#[derive(Debug, Clone)]
pub struct BlockingPoolExecutor {
    handle: Handle,
}

impl BlockingPoolExecutor {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Use the runtime the caller is running in.
    pub fn current() -> TenantryResult<Self> {
        let handle = Handle::try_current().map_err(|e| TaskError::Rejected {
            reason: e.to_string(),
        })?;
        Ok(Self::new(handle))
    }

    pub fn handle(&self) -> &Handle {
        &self.handle
    }
}

fn report_uncaught(result: TenantryResult<()>) {
    if let Err(err) = result {
        tracing::warn!(error = %err, "Uncaught failure in fire-and-forget task");
    }
}

impl TaskExecutor for BlockingPoolExecutor {
    fn execute(&self, task: Task) -> TenantryResult<()> {
        self.handle
            .spawn_blocking(move || report_uncaught(run_catching(task)));
        Ok(())
    }

    /// A task that has not started within `start_timeout` of submission is
    /// dropped without running and the miss is logged.
    fn execute_with_start_timeout(&self, task: Task, start_timeout: Duration) -> TenantryResult<()> {
        let submitted = Instant::now();
        self.handle.spawn_blocking(move || {
            let waited = submitted.elapsed();
            if waited > start_timeout {
                let err = TaskError::StartTimeout {
                    timeout: start_timeout,
                    waited,
                };
                tracing::error!(error = %err, "Task start deadline missed; not running it");
                return;
            }
            report_uncaught(run_catching(task));
        });
        Ok(())
    }

    fn submit(&self, task: Task) -> TenantryResult<TaskHandle<()>> {
        self.submit_value(task)
    }

    fn submit_value<T>(&self, task: ValueTask<T>) -> TenantryResult<TaskHandle<T>>
    where
        T: Send + 'static,
    {
        let (completer, handle) = task_handle();
        self.handle
            .spawn_blocking(move || completer.complete(run_catching(task)));
        Ok(handle)
    }
}
