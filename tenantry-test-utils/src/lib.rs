//! TENANTRY Test Utilities
//!
//! Centralized test infrastructure for the TENANTRY workspace:
//! - Proptest generators for tenants and keys
//! - A single-thread executor whose worker is reused across tasks
//! - Recording and failing interceptors
//! - Custom assertions for TENANTRY results

// Re-export mocks from their source crate
pub use tenantry_cache::{MockCache, MockCacheRegistry};

// Re-export core types for convenience
pub use tenantry_core::{
    is_blank, AfterTaskPolicy, ContextError, ContextHolder, HookPhase, TaskConfig, TaskError,
    TenantryError, TenantryResult,
};

use std::sync::{Arc, Mutex};
use std::thread;

use tenantry_task::{
    run_catching, task_handle, Task, TaskExecutor, TaskHandle, TaskInterceptor, ValueTask,
};
use tokio::sync::mpsc;

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for tenants and cache keys.

    use proptest::prelude::*;

    /// Any tenant value: absent, blank or a real identifier.
    pub fn arb_tenant() -> impl Strategy<Value = Option<String>> {
        prop_oneof![
            Just(None),
            arb_blank_tenant().prop_map(Some),
            arb_non_blank_tenant().prop_map(Some),
        ]
    }

    /// A tenant identifier with at least one non-whitespace character.
    pub fn arb_non_blank_tenant() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_-]{0,11}"
    }

    /// Empty or all-whitespace strings.
    pub fn arb_blank_tenant() -> impl Strategy<Value = String> {
        prop_oneof![Just(String::new()), "[ \t]{1,4}"]
    }

    /// Cache names, possibly containing the `.` separator.
    pub fn arb_cache_name() -> impl Strategy<Value = String> {
        "[a-z]{1,6}(\\.[a-z]{1,4})?"
    }

    pub fn arb_key() -> impl Strategy<Value = String> {
        "[a-z0-9:]{1,10}"
    }
}

// ============================================================================
// EXECUTORS
// ============================================================================

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Runs every task on one dedicated thread, in submission order.
///
/// The worker is reused for every task and never resets its own tenant
/// context, which makes context leaks between tasks observable.
#[derive(Debug, Clone)]
pub struct DedicatedWorkerExecutor {
    jobs: mpsc::UnboundedSender<Job>,
    uncaught: Arc<Mutex<Vec<TenantryError>>>,
}

impl DedicatedWorkerExecutor {
    /// Start the worker thread. It exits once every clone is dropped.
    pub fn spawn(name: &str) -> TenantryResult<Self> {
        let (jobs, mut queue) = mpsc::unbounded_channel::<Job>();
        thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                while let Some(job) = queue.blocking_recv() {
                    job();
                }
            })
            .map_err(|e| TaskError::Rejected {
                reason: e.to_string(),
            })?;
        Ok(Self {
            jobs,
            uncaught: Arc::new(Mutex::new(Vec::new())),
        })
    }

    /// Run `f` on the worker, bypassing any decorators, and wait for it.
    pub fn run_on_worker<T, F>(&self, f: F) -> TenantryResult<T>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        self.submit_value(Box::new(move || -> TenantryResult<T> { Ok(f()) }))?
            .wait()
    }

    /// Wait until every previously queued job has run.
    pub fn flush(&self) -> TenantryResult<()> {
        self.run_on_worker(|| ())
    }

    /// Failures of fire-and-forget tasks, in the order they happened.
    pub fn uncaught(&self) -> Vec<TenantryError> {
        self.uncaught
            .lock()
            .map(|errors| errors.clone())
            .unwrap_or_default()
    }

    fn enqueue(&self, job: Job) -> TenantryResult<()> {
        self.jobs.send(job).map_err(|_| {
            TaskError::Rejected {
                reason: "worker thread has stopped".to_string(),
            }
            .into()
        })
    }
}

impl TaskExecutor for DedicatedWorkerExecutor {
    fn execute(&self, task: Task) -> TenantryResult<()> {
        let uncaught = Arc::clone(&self.uncaught);
        self.enqueue(Box::new(move || {
            if let Err(err) = run_catching(task) {
                tracing::warn!(error = %err, "Uncaught failure in fire-and-forget task");
                if let Ok(mut errors) = uncaught.lock() {
                    errors.push(err);
                }
            }
        }))
    }

    fn submit(&self, task: Task) -> TenantryResult<TaskHandle<()>> {
        self.submit_value(task)
    }

    fn submit_value<T>(&self, task: ValueTask<T>) -> TenantryResult<TaskHandle<T>>
    where
        T: Send + 'static,
    {
        let (completer, handle) = task_handle();
        self.enqueue(Box::new(move || completer.complete(run_catching(task))))?;
        Ok(handle)
    }
}

// ============================================================================
// INTERCEPTORS
// ============================================================================

/// Shared, ordered record of interceptor events.
pub type Journal = Arc<Mutex<Vec<String>>>;

pub fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

/// Snapshot of a journal's entries.
pub fn entries(journal: &Journal) -> Vec<String> {
    journal.lock().map(|e| e.clone()).unwrap_or_default()
}

/// Appends `"<name>:before"` / `"<name>:after"` to a journal, along with
/// the tenant in scope when the hook ran.
#[derive(Debug)]
pub struct RecordingInterceptor {
    name: String,
    journal: Journal,
}

impl RecordingInterceptor {
    pub fn new(name: impl Into<String>, journal: &Journal) -> Self {
        Self {
            name: name.into(),
            journal: Arc::clone(journal),
        }
    }

    /// Same, already boxed for an interceptor list.
    pub fn shared(name: impl Into<String>, journal: &Journal) -> Arc<dyn TaskInterceptor> {
        Arc::new(Self::new(name, journal))
    }

    fn record(&self, phase: &str) {
        let tenant = ContextHolder::get().unwrap_or_else(|| "-".to_string());
        if let Ok(mut entries) = self.journal.lock() {
            entries.push(format!("{}:{phase}@{tenant}", self.name));
        }
    }
}

impl TaskInterceptor for RecordingInterceptor {
    fn name(&self) -> &str {
        &self.name
    }

    fn before_execution(&self) -> TenantryResult<()> {
        self.record("before");
        Ok(())
    }

    fn after_execution(&self) -> TenantryResult<()> {
        self.record("after");
        Ok(())
    }
}

/// Fails in the configured phase.
#[derive(Debug, Clone)]
pub struct FailingInterceptor {
    phase: HookPhase,
}

impl FailingInterceptor {
    pub fn new(phase: HookPhase) -> Self {
        Self { phase }
    }

    fn fail_in(&self, phase: HookPhase) -> TenantryResult<()> {
        if self.phase == phase {
            return Err(TaskError::InterceptorFailed {
                interceptor: "failing".to_string(),
                phase,
                reason: "configured to fail".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

impl TaskInterceptor for FailingInterceptor {
    fn name(&self) -> &str {
        "failing"
    }

    fn before_execution(&self) -> TenantryResult<()> {
        self.fail_in(HookPhase::BeforeExecution)
    }

    fn after_execution(&self) -> TenantryResult<()> {
        self.fail_in(HookPhase::AfterExecution)
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertion helpers for TENANTRY-specific error shapes.

    use super::*;

    /// Assert that a result is a missing-tenant error.
    #[track_caller]
    pub fn assert_context_required<T: std::fmt::Debug>(result: &TenantryResult<T>) {
        match result {
            Err(err) if err.is_context_required() => {}
            other => panic!("Expected ContextRequired error, got: {:?}", other),
        }
    }

    /// Assert that a result is a task error.
    #[track_caller]
    pub fn assert_task_error<T: std::fmt::Debug>(result: &TenantryResult<T>) {
        match result {
            Err(TenantryError::Task(_)) => {}
            other => panic!("Expected Task error, got: {:?}", other),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
