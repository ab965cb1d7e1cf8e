//! REST adapter for the external task queue
//!
//! Speaks the queue's JSON protocol:
//!
//! - `POST /tasks/fetch-and-lock` with worker id, topic, batch size, and
//!   lock duration, returning the locked tasks with their variable bags
//! - `POST /tasks/{id}/complete` with the output variables
//! - `POST /tasks/{id}/failure` with the failure message and details
//!
//! The worker id identifies this process as the lock holder; it is
//! generated once per adapter so every poll from one process renews the
//! same identity.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, PortError};
use infra_queue::{LockedTask, TaskFailure, TaskQueuePort, VariableMap};

use crate::client::{RestClientConfig, RestService};

/// REST-backed implementation of TaskQueuePort
pub struct RestTaskQueue {
    rest: RestService,
    worker_id: String,
}

impl RestTaskQueue {
    pub fn new(config: RestClientConfig) -> Result<Self, PortError> {
        Ok(Self {
            rest: RestService::new("task-queue", config)?,
            worker_id: format!("claims-worker-{}", Uuid::new_v4()),
        })
    }

    /// The lock-holder identity this adapter polls under
    pub fn worker_id(&self) -> &str {
        &self.worker_id
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FetchAndLockRequest<'a> {
    worker_id: &'a str,
    topic: &'a str,
    max_tasks: u32,
    lock_duration_ms: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FetchedTask {
    id: String,
    topic: String,
    #[serde(default)]
    variables: VariableMap,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompleteRequest<'a> {
    worker_id: &'a str,
    variables: &'a VariableMap,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FailureRequest<'a> {
    worker_id: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a str>,
}

impl DomainPort for RestTaskQueue {}

#[async_trait]
impl TaskQueuePort for RestTaskQueue {
    async fn poll_and_lock(
        &self,
        topic: &str,
        max_tasks: u32,
        lock_duration: Duration,
    ) -> Result<Vec<LockedTask>, PortError> {
        let request = FetchAndLockRequest {
            worker_id: &self.worker_id,
            topic,
            max_tasks,
            lock_duration_ms: lock_duration.as_millis() as u64,
        };
        let fetched: Vec<FetchedTask> = self
            .rest
            .post_json("poll_and_lock", "/tasks/fetch-and-lock", &request)
            .await?;
        Ok(fetched
            .into_iter()
            .map(|task| LockedTask::new(task.id, task.topic, task.variables))
            .collect())
    }

    async fn complete(&self, task: &LockedTask, variables: VariableMap) -> Result<(), PortError> {
        let path = format!("/tasks/{}/complete", task.id);
        let request = CompleteRequest {
            worker_id: &self.worker_id,
            variables: &variables,
        };
        self.rest.post_unit("complete", &path, &request).await
    }

    async fn fail(&self, task: &LockedTask, failure: TaskFailure) -> Result<(), PortError> {
        let path = format!("/tasks/{}/failure", task.id);
        let request = FailureRequest {
            worker_id: &self.worker_id,
            message: &failure.message,
            details: failure.details.as_deref(),
        };
        self.rest.post_unit("fail", &path, &request).await
    }
}

#[async_trait]
impl HealthCheckable for RestTaskQueue {
    async fn health_check(&self) -> HealthCheckResult {
        self.rest.probe("/health").await
    }
}
