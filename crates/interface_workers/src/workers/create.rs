//! Claim creation worker
//!
//! Resolves the policy and its holder, files the claim in the remote store
//! with a fresh file number, and hands the customer's contact details back
//! to the process for later notification steps.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, instrument};

use domain_claims::{generate_file_number, ClaimStatus, ClaimStoreService, NewClaim};
use domain_directory::{CustomerLookupService, PolicyLookupService};
use infra_queue::{LockedTask, TaskWorker, VariableMap, WorkerError};

use crate::requests::{vars, ClaimCreateRequest};
use crate::workers::{directory_error, TOPIC_CLAIM_CREATE};

pub struct ClaimCreateWorker {
    policies: Arc<PolicyLookupService>,
    customers: Arc<CustomerLookupService>,
    claims: Arc<ClaimStoreService>,
}

impl ClaimCreateWorker {
    pub fn new(
        policies: Arc<PolicyLookupService>,
        customers: Arc<CustomerLookupService>,
        claims: Arc<ClaimStoreService>,
    ) -> Self {
        Self {
            policies,
            customers,
            claims,
        }
    }
}

#[async_trait]
impl TaskWorker for ClaimCreateWorker {
    fn topic(&self) -> &str {
        TOPIC_CLAIM_CREATE
    }

    #[instrument(skip(self, task), fields(task_id = %task.id))]
    async fn execute(&self, task: &LockedTask) -> Result<VariableMap, WorkerError> {
        let request = ClaimCreateRequest::from_task(task)?;

        let policy = self
            .policies
            .get_by_number(&request.policy_number)
            .await
            .map_err(directory_error)?
            .ok_or_else(|| {
                WorkerError::execution(format!("Policy not found: {}", request.policy_number))
            })?;

        let customer = self
            .customers
            .get_by_id(policy.customer_id)
            .await
            .map_err(directory_error)?
            .ok_or_else(|| {
                WorkerError::execution(format!("Customer not found: {}", policy.customer_id))
            })?;

        let new_claim = NewClaim {
            file_number: generate_file_number(),
            policy_number: request.policy_number.clone(),
            description: request.description.clone(),
            incident_date: request.incident_date,
            reported_date: Utc::now(),
            estimated_amount: request.estimated_amount,
            status: ClaimStatus::Submitted,
        };

        let claim = self
            .claims
            .create(request.claim_type, &new_claim)
            .await
            .ok_or_else(|| {
                WorkerError::execution(format!("Failed to create {} claim", request.claim_type))
            })?;

        info!(
            claim_id = %claim.id,
            file_number = %claim.file_number,
            claim_type = %claim.claim_type,
            "Claim created"
        );

        Ok(VariableMap::new()
            .with(vars::CLAIM_ID, claim.id.value())
            .with(vars::CLAIM_FILE_NUMBER, claim.file_number)
            .with(vars::CUSTOMER_FIRSTNAME, customer.first_name)
            .with(vars::CUSTOMER_LASTNAME, customer.last_name)
            .with(vars::CUSTOMER_NOTIFICATION_EMAIL, customer.notification_email))
    }
}
