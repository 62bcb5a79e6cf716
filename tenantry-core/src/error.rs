//! Error types for TENANTRY operations

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Which pass of an interceptor chain a hook failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPhase {
    BeforeExecution,
    AfterExecution,
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookPhase::BeforeExecution => f.write_str("before-execution"),
            HookPhase::AfterExecution => f.write_str("after-execution"),
        }
    }
}

/// Tenant context errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContextError {
    #[error("Tenant context is required for {operation} but is not available")]
    ContextRequired { operation: String },
}

impl ContextError {
    pub fn required(operation: impl Into<String>) -> Self {
        ContextError::ContextRequired {
            operation: operation.into(),
        }
    }
}

/// Task execution errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskError {
    /// Raised by a task body.
    #[error("Task failed: {reason}")]
    Failed { reason: String },

    /// Re-signalled failure of a fire-and-forget task.
    #[error("Failed to execute task: {reason}")]
    ExecutionFailed { reason: String },

    #[error("Task panicked: {message}")]
    Panicked { message: String },

    #[error("Interceptor {interceptor} failed during {phase}: {reason}")]
    InterceptorFailed {
        interceptor: String,
        phase: HookPhase,
        reason: String,
    },

    #[error("Interceptor state lock poisoned")]
    InterceptorStatePoisoned,

    #[error("Task rejected by executor: {reason}")]
    Rejected { reason: String },

    #[error("Task did not start within {timeout:?} (waited {waited:?})")]
    StartTimeout { timeout: Duration, waited: Duration },

    #[error("Task was cancelled before it produced a result")]
    Cancelled,
}

impl TaskError {
    pub fn failed(reason: impl Into<String>) -> Self {
        TaskError::Failed {
            reason: reason.into(),
        }
    }
}

/// Cache layer errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cache lock poisoned: {cache}")]
    LockPoisoned { cache: String },

    #[error("Cache backend failure in {cache}: {reason}")]
    Backend { cache: String, reason: String },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing configuration file path (set {env_var})")]
    MissingConfigPath { env_var: String },

    #[error("Failed to read config file {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Failed to parse config TOML: {reason}")]
    Parse { reason: String },

    #[error("Failed to initialize tracing subscriber: {reason}")]
    TelemetryInit { reason: String },
}

/// Master error type for all TENANTRY errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TenantryError {
    #[error("Context error: {0}")]
    Context(#[from] ContextError),

    #[error("Task error: {0}")]
    Task(#[from] TaskError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl TenantryError {
    /// True when the error is a missing-but-required tenant context.
    pub fn is_context_required(&self) -> bool {
        matches!(
            self,
            TenantryError::Context(ContextError::ContextRequired { .. })
        )
    }
}

/// Result type alias for TENANTRY operations.
pub type TenantryResult<T> = Result<T, TenantryError>;

// =============================================================================
// TESTS
// =============================================================================
