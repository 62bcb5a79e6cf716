//! TENANTRY Task - Tenant Context Across Thread Hand-off
//!
//! A task submitted on one thread usually runs on another. This crate wraps
//! tasks in [`TaskInterceptor`] chains so work can be bracketed with setup
//! and teardown on whichever thread runs it, and provides
//! [`ContextPropagatingExecutor`], which uses that to run every task under
//! the tenant that was current when it was submitted.
//!
//! # Example
//!
//! ```ignore
//! let executor = ContextPropagatingExecutor::new(BlockingPoolExecutor::current()?);
//!
//! ContextHolder::set(Some("acme".to_string()));
//! let tenant = executor
//!     .submit_value(Box::new(|| Ok(ContextHolder::get())))?
//!     .await?;
//! assert_eq!(tenant.as_deref(), Some("acme"));
//! ```

pub mod blocking;
pub mod chain;
pub mod executor;
pub mod intercepting;
pub mod interceptor;
pub mod propagating;
pub mod wrapper;

pub use blocking::BlockingPoolExecutor;
pub use chain::TaskInterceptorChain;
pub use executor::{
    panic_message, run_catching, task_handle, Task, TaskCompleter, TaskExecutor, TaskHandle,
    ValueTask,
};
pub use intercepting::InterceptingExecutor;
pub use interceptor::{TaskInterceptor, TenantContextInterceptor};
pub use propagating::ContextPropagatingExecutor;
pub use wrapper::{intercept_task, intercept_value_task, InterceptedTask, InterceptedValueTask};
