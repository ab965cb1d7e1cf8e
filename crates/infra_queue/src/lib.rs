//! External Task Queue
//!
//! The queue protocol this system consumes and the worker framework built
//! on it. The external workflow engine owns the process state; this crate
//! only polls for topic-tagged units of work, executes them through the
//! [`TaskWorker`] contract, and reports completion or failure back.
//!
//! # Execution model
//!
//! ```text
//! poll_and_lock(topic) -> [task]
//!   execute(task)      -> Ok(outputs)  => complete(task, outputs)
//!                      -> Err(error)   => fail(task, error message)
//! ```
//!
//! Workers never retry; the queue redelivers after lock expiry or applies
//! its own retry policy to failed tasks. Everything a worker does must
//! therefore be safe to repeat.

pub mod host;
pub mod ports;
pub mod task;
pub mod worker;

pub use host::{poll_once, HostError, PollerConfig, WorkerHost};
pub use ports::{TaskFailure, TaskQueuePort};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::{CompletedTask, FailedTask, MockTaskQueue};
pub use task::{LockedTask, VariableError, VariableMap};
pub use worker::{TaskWorker, WorkerError};
