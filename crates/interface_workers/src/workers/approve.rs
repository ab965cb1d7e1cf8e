//! Repair approval worker
//!
//! Moves a claim to APPROVED after the process has cleared the repair. The
//! transition guard in the claim aggregate decides whether the move is
//! legal; a redelivered task finds the claim already approved and succeeds
//! without a second effect.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument};

use domain_claims::{ClaimStatus, ClaimStoreService};
use infra_queue::{LockedTask, TaskWorker, VariableMap, WorkerError};

use crate::requests::ClaimReferenceRequest;
use crate::workers::{claim_error, TOPIC_CLAIM_APPROVE_REPAIR};

pub struct RepairApprovalWorker {
    claims: Arc<ClaimStoreService>,
}

impl RepairApprovalWorker {
    pub fn new(claims: Arc<ClaimStoreService>) -> Self {
        Self { claims }
    }
}

#[async_trait]
impl TaskWorker for RepairApprovalWorker {
    fn topic(&self) -> &str {
        TOPIC_CLAIM_APPROVE_REPAIR
    }

    #[instrument(skip(self, task), fields(task_id = %task.id))]
    async fn execute(&self, task: &LockedTask) -> Result<VariableMap, WorkerError> {
        let request = ClaimReferenceRequest::from_task(task)?;

        let mut claim = self
            .claims
            .get_by_id(request.claim_type, request.claim_id)
            .await
            .map_err(claim_error)?
            .ok_or_else(|| {
                WorkerError::execution(format!(
                    "{} claim {} not found",
                    request.claim_type, request.claim_id
                ))
            })?;

        claim.update_status(ClaimStatus::Approved).map_err(claim_error)?;

        self.claims
            .update(request.claim_type, request.claim_id, &claim)
            .await
            .map_err(claim_error)?
            .ok_or_else(|| {
                WorkerError::execution(format!(
                    "Failed to update {} claim {}",
                    request.claim_type, request.claim_id
                ))
            })?;

        info!(claim_id = %request.claim_id, "Repair approved");
        Ok(VariableMap::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;

    use core_kernel::InMemoryCache;
    use domain_claims::ports::ClaimStorePort;
    use domain_claims::{ClaimType, MockClaimStore, NewClaim};
    use infra_queue::TaskFailure;

    use crate::requests::vars;

    fn worker_over(store: Arc<MockClaimStore>) -> RepairApprovalWorker {
        let claims = Arc::new(ClaimStoreService::new(
            Some(store),
            Arc::new(InMemoryCache::new()),
        ));
        RepairApprovalWorker::new(claims)
    }

    async fn seed_claim(store: &MockClaimStore, claim_type: ClaimType) -> i64 {
        let claim = store
            .create_claim(
                claim_type,
                &NewClaim {
                    file_number: "CLM-40".to_string(),
                    policy_number: core_kernel::PolicyNumber::new("P-40"),
                    description: "Hail damage to the roof".to_string(),
                    incident_date: NaiveDate::from_ymd_opt(2025, 1, 8).unwrap(),
                    reported_date: Utc::now(),
                    estimated_amount: dec!(5600),
                    status: ClaimStatus::Submitted,
                },
            )
            .await
            .unwrap();
        claim.id.value()
    }

    fn reference_task(claim_id: i64, claim_type: &str) -> LockedTask {
        LockedTask::new(
            "t-approve",
            TOPIC_CLAIM_APPROVE_REPAIR,
            VariableMap::new()
                .with(vars::CLAIM_ID, claim_id)
                .with(vars::CLAIM_TYPE, claim_type),
        )
    }

    #[tokio::test]
    async fn test_approves_submitted_claim() {
        let store = Arc::new(MockClaimStore::new());
        let claim_id = seed_claim(&store, ClaimType::Home).await;
        let worker = worker_over(Arc::clone(&store));

        let output = worker
            .execute(&reference_task(claim_id, "HOME"))
            .await
            .unwrap();

        assert!(output.is_empty());
        let stored = store.stored_claim(ClaimType::Home, claim_id).await.unwrap();
        assert_eq!(stored.status, ClaimStatus::Approved);
    }

    #[tokio::test]
    async fn test_missing_claim_id_fails_before_any_remote_call() {
        let store = Arc::new(MockClaimStore::new());
        let worker = worker_over(Arc::clone(&store));
        let task = LockedTask::new(
            "t-approve",
            TOPIC_CLAIM_APPROVE_REPAIR,
            VariableMap::new().with(vars::CLAIM_TYPE, "HOME"),
        );

        let error = worker.execute(&task).await.unwrap_err();

        assert_eq!(error.to_string(), "Claim ID cannot be null");
        assert_eq!(
            TaskFailure::from_worker_error(&error).message,
            "Claim ID cannot be null"
        );
        assert_eq!(store.get_calls(), 0);
        assert_eq!(store.update_calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_claim_fails_with_typed_message() {
        let store = Arc::new(MockClaimStore::new());
        let worker = worker_over(store);

        let error = worker
            .execute(&reference_task(404, "AUTO"))
            .await
            .unwrap_err();

        assert_eq!(error.to_string(), "AUTO claim 404 not found");
    }

    #[tokio::test]
    async fn test_redelivered_approval_succeeds_again() {
        let store = Arc::new(MockClaimStore::new());
        let claim_id = seed_claim(&store, ClaimType::Auto).await;
        let worker = worker_over(Arc::clone(&store));
        let task = reference_task(claim_id, "AUTO");

        worker.execute(&task).await.unwrap();
        worker.execute(&task).await.unwrap();

        let stored = store.stored_claim(ClaimType::Auto, claim_id).await.unwrap();
        assert_eq!(stored.status, ClaimStatus::Approved);
        assert_eq!(store.update_calls(), 2);
    }
}
