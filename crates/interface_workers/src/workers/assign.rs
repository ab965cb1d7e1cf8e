//! Adjuster assignment worker
//!
//! Asks the assignment service for one available external adjuster and
//! reports the assignment back to the process. No available adjuster is a
//! task failure, so the queue's retry policy can try again once the pool
//! recovers.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument};

use domain_claims::AdjusterAssignmentService;
use infra_queue::{LockedTask, TaskWorker, VariableMap, WorkerError};

use crate::requests::{vars, ClaimReferenceRequest};
use crate::workers::{claim_error, TOPIC_CLAIM_ASSIGN_ADJUSTER};

pub struct AdjusterAssignmentWorker {
    assignments: Arc<AdjusterAssignmentService>,
}

impl AdjusterAssignmentWorker {
    pub fn new(assignments: Arc<AdjusterAssignmentService>) -> Self {
        Self { assignments }
    }
}

#[async_trait]
impl TaskWorker for AdjusterAssignmentWorker {
    fn topic(&self) -> &str {
        TOPIC_CLAIM_ASSIGN_ADJUSTER
    }

    #[instrument(skip(self, task), fields(task_id = %task.id))]
    async fn execute(&self, task: &LockedTask) -> Result<VariableMap, WorkerError> {
        let request = ClaimReferenceRequest::from_task(task)?;

        let adjuster = self
            .assignments
            .assign(request.claim_type, request.claim_id)
            .await
            .map_err(claim_error)?
            .ok_or_else(|| {
                WorkerError::execution(format!(
                    "No available adjuster for {} claim {}",
                    request.claim_type, request.claim_id
                ))
            })?;

        info!(
            claim_id = %request.claim_id,
            adjuster_id = %adjuster.id,
            adjuster = %adjuster.full_name(),
            "Adjuster assigned"
        );

        Ok(VariableMap::new().with(vars::ADJUSTER_ID, adjuster.id.value()))
    }
}
