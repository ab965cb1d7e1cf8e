//! Task queue port
//!
//! The narrow slice of the external queue's protocol this system uses:
//! poll-and-lock a batch for one topic, then complete or fail each task.
//! Retry and backoff policy lives entirely on the queue's side; reporting a
//! failure hands the task back to that policy.

use std::time::Duration;

use async_trait::async_trait;

use core_kernel::{DomainPort, PortError};

use crate::task::{LockedTask, VariableMap};
use crate::worker::WorkerError;

/// A failure report for a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFailure {
    /// Short message surfaced to the queue and its operators
    pub message: String,
    /// Longer detail, stack-trace-shaped on other platforms
    pub details: Option<String>,
}

impl TaskFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: None,
        }
    }

    /// Builds the report for a worker error, message verbatim
    pub fn from_worker_error(error: &WorkerError) -> Self {
        Self::new(error.to_string())
    }
}

/// Port for the external task queue
#[async_trait]
pub trait TaskQueuePort: DomainPort {
    /// Fetches up to `max_tasks` unlocked tasks for the topic, locking each
    /// for `lock_duration`
    async fn poll_and_lock(
        &self,
        topic: &str,
        max_tasks: u32,
        lock_duration: Duration,
    ) -> Result<Vec<LockedTask>, PortError>;

    /// Completes the task, merging the output variables into the process
    async fn complete(&self, task: &LockedTask, variables: VariableMap) -> Result<(), PortError>;

    /// Reports the task as failed, releasing it to the queue's retry policy
    async fn fail(&self, task: &LockedTask, failure: TaskFailure) -> Result<(), PortError>;
}

/// Mock implementation for testing
///
/// An in-memory queue that hands out enqueued tasks and records every
/// completion and failure report, so tests can drive a worker through full
/// poll cycles and assert what was reported back.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::{HashMap, VecDeque};
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// A completion report recorded by the mock queue
    #[derive(Debug, Clone, PartialEq)]
    pub struct CompletedTask {
        pub task_id: String,
        pub variables: VariableMap,
    }

    /// A failure report recorded by the mock queue
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct FailedTask {
        pub task_id: String,
        pub failure: TaskFailure,
    }

    /// In-memory mock implementation of TaskQueuePort
    #[derive(Debug, Default)]
    pub struct MockTaskQueue {
        pending: Arc<RwLock<HashMap<String, VecDeque<LockedTask>>>>,
        completions: Arc<RwLock<Vec<CompletedTask>>>,
        failures: Arc<RwLock<Vec<FailedTask>>>,
        poll_calls: AtomicU64,
        failing: AtomicBool,
    }

    impl MockTaskQueue {
        /// Creates an empty mock queue
        pub fn new() -> Self {
            Self::default()
        }

        /// Enqueues a task for its topic
        ///
        /// Re-enqueueing a polled task simulates the queue redelivering
        /// after a lost completion signal.
        pub async fn enqueue(&self, task: LockedTask) {
            self.pending
                .write()
                .await
                .entry(task.topic.clone())
                .or_default()
                .push_back(task);
        }

        /// Completion reports in arrival order
        pub async fn completed(&self) -> Vec<CompletedTask> {
            self.completions.read().await.clone()
        }

        /// Failure reports in arrival order
        pub async fn failed(&self) -> Vec<FailedTask> {
            self.failures.read().await.clone()
        }

        /// Tasks still waiting on the given topic
        pub async fn pending_count(&self, topic: &str) -> usize {
            self.pending
                .read()
                .await
                .get(topic)
                .map_or(0, VecDeque::len)
        }

        pub fn poll_calls(&self) -> u64 {
            self.poll_calls.load(Ordering::SeqCst)
        }

        /// Makes every subsequent call fail with a connection error
        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        fn check_up(&self) -> Result<(), PortError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(PortError::connection("task queue unreachable"));
            }
            Ok(())
        }
    }

    impl DomainPort for MockTaskQueue {}

    #[async_trait]
    impl TaskQueuePort for MockTaskQueue {
        async fn poll_and_lock(
            &self,
            topic: &str,
            max_tasks: u32,
            _lock_duration: Duration,
        ) -> Result<Vec<LockedTask>, PortError> {
            self.poll_calls.fetch_add(1, Ordering::SeqCst);
            self.check_up()?;

            let mut pending = self.pending.write().await;
            let Some(queue) = pending.get_mut(topic) else {
                return Ok(Vec::new());
            };
            let take = (max_tasks as usize).min(queue.len());
            Ok(queue.drain(..take).collect())
        }

        async fn complete(
            &self,
            task: &LockedTask,
            variables: VariableMap,
        ) -> Result<(), PortError> {
            self.check_up()?;
            self.completions.write().await.push(CompletedTask {
                task_id: task.id.clone(),
                variables,
            });
            Ok(())
        }

        async fn fail(&self, task: &LockedTask, failure: TaskFailure) -> Result<(), PortError> {
            self.check_up()?;
            self.failures.write().await.push(FailedTask {
                task_id: task.id.clone(),
                failure,
            });
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::*;
    use super::*;

    fn task(id: &str, topic: &str) -> LockedTask {
        LockedTask::new(id, topic, VariableMap::new())
    }

    #[tokio::test]
    async fn test_poll_respects_topic_and_batch_size() {
        let queue = MockTaskQueue::new();
        queue.enqueue(task("a", "claim-create")).await;
        queue.enqueue(task("b", "claim-create")).await;
        queue.enqueue(task("c", "claim-create")).await;
        queue.enqueue(task("d", "payment-execute")).await;

        let batch = queue
            .poll_and_lock("claim-create", 2, Duration::from_secs(30))
            .await
            .unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].id, "a");
        assert_eq!(batch[1].id, "b");
        assert_eq!(queue.pending_count("claim-create").await, 1);
        assert_eq!(queue.pending_count("payment-execute").await, 1);
    }

    #[tokio::test]
    async fn test_poll_unknown_topic_returns_empty_batch() {
        let queue = MockTaskQueue::new();
        let batch = queue
            .poll_and_lock("claim-approve-repair", 5, Duration::from_secs(30))
            .await
            .unwrap();
        assert!(batch.is_empty());
        assert_eq!(queue.poll_calls(), 1);
    }

    #[tokio::test]
    async fn test_complete_and_fail_are_recorded() {
        let queue = MockTaskQueue::new();
        let first = task("a", "claim-create");
        let second = task("b", "claim-create");

        queue
            .complete(&first, VariableMap::new().with("claim_id", 7))
            .await
            .unwrap();
        queue
            .fail(&second, TaskFailure::new("Policy not found: P-404"))
            .await
            .unwrap();

        let completed = queue.completed().await;
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].task_id, "a");
        assert_eq!(completed[0].variables.require_i64("claim_id").unwrap(), 7);

        let failed = queue.failed().await;
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].failure.message, "Policy not found: P-404");
    }

    #[tokio::test]
    async fn test_failing_state() {
        let queue = MockTaskQueue::new();
        queue.set_failing(true);

        let result = queue
            .poll_and_lock("claim-create", 1, Duration::from_secs(30))
            .await;
        assert!(result.unwrap_err().is_transient());
    }
}
