//! Task executor abstraction and completion handles.

use std::any::Any;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use tenantry_core::{TaskError, TenantryResult};
use tokio::sync::oneshot;

/// A fire-and-forget unit of work.
pub type Task = Box<dyn FnOnce() -> TenantryResult<()> + Send + 'static>;

/// A unit of work that produces a value.
pub type ValueTask<T> = Box<dyn FnOnce() -> TenantryResult<T> + Send + 'static>;

/// Something that runs tasks, possibly on other threads.
///
/// Implementations decide scheduling, pooling and cancellation. The
/// decorators in this crate only wrap tasks before handing them over.
pub trait TaskExecutor: Send + Sync {
    /// Run `task` at some point. Failures of the task itself are the
    /// executor's to report; the returned error only covers submission.
    fn execute(&self, task: Task) -> TenantryResult<()>;

    /// Like [`execute`](Self::execute), with a hint for how long the task
    /// may wait before it starts. The default ignores the hint.
    fn execute_with_start_timeout(&self, task: Task, start_timeout: Duration) -> TenantryResult<()> {
        let _ = start_timeout;
        self.execute(task)
    }

    /// Run `task` and return a handle that resolves when it finishes.
    fn submit(&self, task: Task) -> TenantryResult<TaskHandle<()>>;

    /// Run `task` and return a handle that resolves to its value.
    fn submit_value<T>(&self, task: ValueTask<T>) -> TenantryResult<TaskHandle<T>>
    where
        T: Send + 'static;
}

/// Create a connected completer/handle pair.
pub fn task_handle<T>() -> (TaskCompleter<T>, TaskHandle<T>) {
    let (tx, rx) = oneshot::channel();
    (TaskCompleter { tx }, TaskHandle { rx })
}

/// Producer side of a [`TaskHandle`], held by the executor.
#[derive(Debug)]
pub struct TaskCompleter<T> {
    tx: oneshot::Sender<TenantryResult<T>>,
}

impl<T> TaskCompleter<T> {
    /// Deliver the task outcome. Dropped silently if nobody is waiting.
    pub fn complete(self, result: TenantryResult<T>) {
        if self.tx.send(result).is_err() {
            tracing::trace!("Task handle dropped before completion");
        }
    }
}

/// Resolves to the outcome of a submitted task.
///
/// Await it from async code or call [`wait`](Self::wait) from a plain
/// thread. If the executor drops the task without running it, the handle
/// resolves to [`TaskError::Cancelled`].
#[derive(Debug)]
pub struct TaskHandle<T> {
    rx: oneshot::Receiver<TenantryResult<T>>,
}

impl<T> TaskHandle<T> {
    /// Block the current thread until the task finishes.
    ///
    /// Panics when called from within an async runtime; await the handle there.
    pub fn wait(self) -> TenantryResult<T> {
        self.rx
            .blocking_recv()
            .unwrap_or_else(|_| Err(TaskError::Cancelled.into()))
    }

    /// The outcome, if the task has already finished.
    pub fn try_result(&mut self) -> Option<TenantryResult<T>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(TaskError::Cancelled.into())),
        }
    }
}

impl<T> Future for TaskHandle<T> {
    type Output = TenantryResult<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|received| received.unwrap_or_else(|_| Err(TaskError::Cancelled.into())))
    }
}

/// Best-effort text of a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Run `task`, turning a panic into [`TaskError::Panicked`].
pub fn run_catching<T>(task: ValueTask<T>) -> TenantryResult<T> {
    std::panic::catch_unwind(std::panic::AssertUnwindSafe(task)).unwrap_or_else(|payload| {
        Err(TaskError::Panicked {
            message: panic_message(payload.as_ref()),
        }
        .into())
    })
}
