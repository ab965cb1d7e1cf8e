//! The worker contract
//!
//! A worker owns exactly one topic and turns a locked task's input
//! variables into output variables. Any error becomes a failure report to
//! the queue; the worker itself never retries, that policy belongs to the
//! queue configuration.

use async_trait::async_trait;
use thiserror::Error;

use crate::task::{LockedTask, VariableMap};
use crate::VariableError;

/// An error raised by a worker's business logic
///
/// The queue does not distinguish the variants; they exist so logs can say
/// which stage gave up. The display text is relayed to the queue verbatim
/// as the failure message.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// The task's input failed validation
    #[error("{0}")]
    Validation(String),

    /// A business rule was violated
    #[error("{0}")]
    Invariant(String),

    /// A remote operation the task depends on did not succeed
    #[error("{0}")]
    Execution(String),

    /// A required variable was absent or mistyped
    #[error(transparent)]
    Variable(#[from] VariableError),
}

impl WorkerError {
    pub fn validation(message: impl Into<String>) -> Self {
        WorkerError::Validation(message.into())
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        WorkerError::Invariant(message.into())
    }

    pub fn execution(message: impl Into<String>) -> Self {
        WorkerError::Execution(message.into())
    }

    /// Stage label for log fields
    pub fn kind(&self) -> &'static str {
        match self {
            WorkerError::Validation(_) => "validation",
            WorkerError::Invariant(_) => "invariant",
            WorkerError::Execution(_) => "execution",
            WorkerError::Variable(_) => "variable",
        }
    }
}

/// Business logic bound to one queue topic
#[async_trait]
pub trait TaskWorker: Send + Sync + 'static {
    /// The topic this worker subscribes to
    fn topic(&self) -> &str;

    /// Executes one locked task
    ///
    /// Side effects must be safe to repeat: the queue redelivers a task
    /// whose completion signal was lost.
    async fn execute(&self, task: &LockedTask) -> Result<VariableMap, WorkerError>;
}
