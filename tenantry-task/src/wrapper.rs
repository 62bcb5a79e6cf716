//! Wrappers that bracket a unit of work with an interceptor chain.

use std::panic::{self, AssertUnwindSafe};

use tenantry_core::{AfterTaskPolicy, TaskError, TenantryResult};

use crate::chain::TaskInterceptorChain;
use crate::executor::{panic_message, Task, ValueTask};

/// A value-returning task bracketed by an interceptor chain.
///
/// Runs the before-pass, the body, then the after-pass, and returns the
/// body's result. Every failure reaches the caller unchanged.
///
/// With [`AfterTaskPolicy::Always`] the after-pass also runs when the body
/// fails or panics; a panic resumes once the after-pass is done. With
/// [`AfterTaskPolicy::OnSuccess`] a failing body skips the after-pass.
/// A failing before-pass never runs the body or the after-pass.
pub struct InterceptedValueTask<F> {
    task: F,
    chain: TaskInterceptorChain,
    policy: AfterTaskPolicy,
}

impl<F, T> InterceptedValueTask<F>
where
    F: FnOnce() -> TenantryResult<T>,
{
    pub fn new(task: F, chain: TaskInterceptorChain) -> Self {
        Self {
            task,
            chain,
            policy: AfterTaskPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: AfterTaskPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn call(self) -> TenantryResult<T> {
        let Self {
            task,
            chain,
            policy,
        } = self;

        chain.apply_before_task()?;

        match policy {
            AfterTaskPolicy::OnSuccess => {
                let value = task()?;
                chain.apply_after_task()?;
                Ok(value)
            }
            AfterTaskPolicy::Always => match panic::catch_unwind(AssertUnwindSafe(task)) {
                Ok(Ok(value)) => {
                    chain.apply_after_task()?;
                    Ok(value)
                }
                Ok(Err(err)) => {
                    unwind_after_failure(&chain);
                    Err(err)
                }
                Err(payload) => {
                    unwind_after_failure(&chain);
                    panic::resume_unwind(payload)
                }
            },
        }
    }
}

/// A fire-and-forget task bracketed by an interceptor chain.
///
/// Any failure from the hooks or the body, including a panic, is logged and
/// re-signalled as [`TaskError::ExecutionFailed`].
pub struct InterceptedTask<F> {
    inner: InterceptedValueTask<F>,
}

impl<F> InterceptedTask<F>
where
    F: FnOnce() -> TenantryResult<()>,
{
    pub fn new(task: F, chain: TaskInterceptorChain) -> Self {
        Self {
            inner: InterceptedValueTask::new(task, chain),
        }
    }

    pub fn with_policy(self, policy: AfterTaskPolicy) -> Self {
        Self {
            inner: self.inner.with_policy(policy),
        }
    }

    pub fn run(self) -> TenantryResult<()> {
        let inner = self.inner;
        let outcome = panic::catch_unwind(AssertUnwindSafe(move || inner.call()))
            .unwrap_or_else(|payload| {
                Err(TaskError::Panicked {
                    message: panic_message(payload.as_ref()),
                }
                .into())
            });
        outcome.map_err(|err| {
            tracing::error!(error = %err, "Failed to execute task");
            TaskError::ExecutionFailed {
                reason: err.to_string(),
            }
            .into()
        })
    }
}

fn unwind_after_failure(chain: &TaskInterceptorChain) {
    if let Err(err) = chain.apply_after_task() {
        tracing::warn!(error = %err, "After-task interceptors failed while unwinding a failed task");
    }
}

/// Box `task` into a fire-and-forget task that runs under `chain`.
pub fn intercept_task(task: Task, chain: TaskInterceptorChain, policy: AfterTaskPolicy) -> Task {
    let wrapped = InterceptedTask::new(task, chain).with_policy(policy);
    Box::new(move || wrapped.run())
}

/// Box `task` into a value-returning task that runs under `chain`.
pub fn intercept_value_task<T>(
    task: ValueTask<T>,
    chain: TaskInterceptorChain,
    policy: AfterTaskPolicy,
) -> ValueTask<T>
where
    T: Send + 'static,
{
    let wrapped = InterceptedValueTask::new(task, chain).with_policy(policy);
    Box::new(move || wrapped.call())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interceptor::{TaskInterceptor, TenantContextInterceptor};
    use std::sync::{Arc, Mutex};
    use tenantry_core::{ContextHolder, HookPhase, TenantryError};

    #[derive(Default)]
    struct Counting {
        before: Mutex<u32>,
        after: Mutex<u32>,
        fail_before: bool,
    }

    impl TaskInterceptor for Counting {
        fn before_execution(&self) -> TenantryResult<()> {
            *self.before.lock().unwrap() += 1;
            if self.fail_before {
                return Err(TaskError::InterceptorFailed {
                    interceptor: "counting".to_string(),
                    phase: HookPhase::BeforeExecution,
                    reason: "refused".to_string(),
                }
                .into());
            }
            Ok(())
        }

        fn after_execution(&self) -> TenantryResult<()> {
            *self.after.lock().unwrap() += 1;
            Ok(())
        }
    }

    fn chain_of(counting: &Arc<Counting>) -> TaskInterceptorChain {
        TaskInterceptorChain::new(vec![Arc::clone(counting) as Arc<dyn TaskInterceptor>])
    }

    fn counts(counting: &Counting) -> (u32, u32) {
        (*counting.before.lock().unwrap(), *counting.after.lock().unwrap())
    }

    #[test]
    fn test_value_task_returns_result() {
        let counting = Arc::new(Counting::default());
        let result = InterceptedValueTask::new(|| Ok(42), chain_of(&counting)).call();
        assert_eq!(result, Ok(42));
        assert_eq!(counts(&counting), (1, 1));
    }

    #[test]
    fn test_value_task_observes_context_inside_body() {
        ContextHolder::set(Some("worker".to_string()));
        let chain = TaskInterceptorChain::new(vec![Arc::new(TenantContextInterceptor::new(Some(
            "submitter".to_string(),
        ))) as Arc<dyn TaskInterceptor>]);

        let seen = InterceptedValueTask::new(|| Ok(ContextHolder::get()), chain).call();
        assert_eq!(seen, Ok(Some("submitter".to_string())));
        assert_eq!(ContextHolder::get().as_deref(), Some("worker"));
    }

    #[test]
    fn test_body_failure_propagates_unchanged() {
        let counting = Arc::new(Counting::default());
        let result: TenantryResult<u8> =
            InterceptedValueTask::new(|| Err(TaskError::failed("db down").into()), chain_of(&counting)).call();
        assert_eq!(result, Err(TenantryError::Task(TaskError::failed("db down"))));
    }

    #[test]
    fn test_always_policy_runs_after_hooks_on_failure() {
        let counting = Arc::new(Counting::default());
        let _ = InterceptedValueTask::new(
            || -> TenantryResult<()> { Err(TaskError::failed("boom").into()) },
            chain_of(&counting),
        )
        .with_policy(AfterTaskPolicy::Always)
        .call();
        assert_eq!(counts(&counting), (1, 1));
    }

    #[test]
    fn test_on_success_policy_skips_after_hooks_on_failure() {
        let counting = Arc::new(Counting::default());
        let _ = InterceptedValueTask::new(
            || -> TenantryResult<()> { Err(TaskError::failed("boom").into()) },
            chain_of(&counting),
        )
        .with_policy(AfterTaskPolicy::OnSuccess)
        .call();
        assert_eq!(counts(&counting), (1, 0));
    }

    #[test]
    fn test_always_policy_restores_context_on_panic() {
        ContextHolder::set(Some("worker".to_string()));
        let chain = TaskInterceptorChain::new(vec![Arc::new(TenantContextInterceptor::new(Some(
            "submitter".to_string(),
        ))) as Arc<dyn TaskInterceptor>]);

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            InterceptedValueTask::new(|| -> TenantryResult<()> { panic!("task exploded") }, chain)
                .call()
        }));

        assert!(outcome.is_err());
        assert_eq!(ContextHolder::get().as_deref(), Some("worker"));
    }

    #[test]
    fn test_before_failure_skips_body_and_after_hooks() {
        let counting = Arc::new(Counting {
            fail_before: true,
            ..Default::default()
        });
        let ran = Arc::new(Mutex::new(false));
        let ran_in_task = Arc::clone(&ran);

        let result = InterceptedValueTask::new(
            move || {
                *ran_in_task.lock().unwrap() = true;
                Ok(())
            },
            chain_of(&counting),
        )
        .call();

        assert!(result.is_err());
        assert!(!*ran.lock().unwrap());
        assert_eq!(counts(&counting), (1, 0));
    }

    #[test]
    fn test_fire_and_forget_resignals_failure() {
        let counting = Arc::new(Counting::default());
        let err = InterceptedTask::new(|| Err(TaskError::failed("disk full").into()), chain_of(&counting))
            .run()
            .unwrap_err();

        match err {
            TenantryError::Task(TaskError::ExecutionFailed { reason }) => {
                assert!(reason.contains("disk full"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(counts(&counting), (1, 1));
    }

    #[test]
    fn test_fire_and_forget_panic_is_resignalled_after_unwinding() {
        let counting = Arc::new(Counting::default());
        let err = InterceptedTask::new(|| -> TenantryResult<()> { panic!("worker fell over") }, chain_of(&counting))
            .run()
            .unwrap_err();

        match err {
            TenantryError::Task(TaskError::ExecutionFailed { reason }) => {
                assert!(reason.contains("worker fell over"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(counts(&counting), (1, 1));
    }

    #[test]
    fn test_fire_and_forget_on_success_policy() {
        let counting = Arc::new(Counting::default());
        let result = InterceptedTask::new(|| Err(TaskError::failed("x").into()), chain_of(&counting))
            .with_policy(AfterTaskPolicy::OnSuccess)
            .run();
        assert!(result.is_err());
        assert_eq!(counts(&counting), (1, 0));
    }

    #[test]
    fn test_boxed_helpers() {
        let counting = Arc::new(Counting::default());
        let task = intercept_task(
            Box::new(|| -> TenantryResult<()> { Ok(()) }),
            chain_of(&counting),
            AfterTaskPolicy::Always,
        );
        let value = intercept_value_task(
            Box::new(|| -> TenantryResult<&'static str> { Ok("done") }),
            chain_of(&counting),
            AfterTaskPolicy::Always,
        );

        assert!(task().is_ok());
        assert_eq!(value(), Ok("done"));
        assert_eq!(counts(&counting), (2, 2));
    }
}
