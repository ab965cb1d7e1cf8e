//! Claim rejection workers
//!
//! Two rejection paths share one shape: notify the customer from a fixed
//! template, then persist a REJECTED decision with a zero approved amount.
//! A failed notification is recorded in the output variables and never
//! fails the task; a failed decision write does, so the queue retries the
//! whole step.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument, warn};

use core_kernel::PolicyNumber;
use domain_claims::{ClaimDecision, ClaimStoreService};
use domain_directory::{NotificationOutcome, NotificationService, PolicyLookupService};
use infra_queue::{LockedTask, TaskWorker, VariableMap, WorkerError};

use crate::requests::{
    vars, DecisionRejectionRequest, InvalidPolicyRejectionRequest, RejectionContext,
};
use crate::workers::{
    claim_error, directory_error, TOPIC_CLAIM_REJECT_DECISION, TOPIC_CLAIM_REJECT_INVALID_POLICY,
};

/// Customer message for a rejection caused by the policy not covering the
/// claim
fn invalid_policy_message(name: &str, file_number: &str, policy: &PolicyNumber) -> String {
    format!(
        "Dear {name}, we are sorry to inform you that your claim {file_number} \
         cannot be accepted: policy {policy} does not cover this claim. \
         Please contact our service team for further assistance."
    )
}

/// Customer message for a rejection decided by an adjuster
fn decision_rejection_message(
    name: &str,
    file_number: &str,
    policy: &PolicyNumber,
    notes: &str,
) -> String {
    format!(
        "Dear {name}, we are sorry to inform you that your claim {file_number} \
         against policy {policy} was rejected after review. Adjuster notes: {notes}"
    )
}

/// Persists the rejection decision and shapes the shared output variables
async fn finish_rejection(
    claims: &ClaimStoreService,
    context: &RejectionContext,
    decision: ClaimDecision,
    outcome: NotificationOutcome,
) -> Result<VariableMap, WorkerError> {
    claims
        .create_decision(&decision, context.claim_type)
        .await
        .map_err(claim_error)?
        .ok_or_else(|| {
            WorkerError::execution(format!(
                "Failed to persist rejection decision for claim {}",
                context.claim_id
            ))
        })?;

    if !outcome.sent {
        warn!(claim_id = %context.claim_id, "Rejection notification was not delivered");
    }
    info!(
        claim_id = %context.claim_id,
        notification_sent = outcome.sent,
        "Claim rejected"
    );

    Ok(VariableMap::new()
        .with(vars::NOTIFICATION_SENT, outcome.sent)
        .with(vars::NOTIFICATION_MESSAGE, outcome.message))
}

/// Rejects a claim whose policy does not cover it
pub struct InvalidPolicyRejectionWorker {
    policies: Arc<PolicyLookupService>,
    notifications: Arc<NotificationService>,
    claims: Arc<ClaimStoreService>,
}

impl InvalidPolicyRejectionWorker {
    pub fn new(
        policies: Arc<PolicyLookupService>,
        notifications: Arc<NotificationService>,
        claims: Arc<ClaimStoreService>,
    ) -> Self {
        Self {
            policies,
            notifications,
            claims,
        }
    }
}

#[async_trait]
impl TaskWorker for InvalidPolicyRejectionWorker {
    fn topic(&self) -> &str {
        TOPIC_CLAIM_REJECT_INVALID_POLICY
    }

    #[instrument(skip(self, task), fields(task_id = %task.id))]
    async fn execute(&self, task: &LockedTask) -> Result<VariableMap, WorkerError> {
        let request = InvalidPolicyRejectionRequest::from_task(task)?;
        let context = &request.context;

        // The rejection is about coverage, not existence; a policy the
        // directory does not know is a data problem for the queue to retry.
        self.policies
            .get_by_number(&context.policy_number)
            .await
            .map_err(directory_error)?
            .ok_or_else(|| {
                WorkerError::execution(format!("Policy not found: {}", context.policy_number))
            })?;

        let message = invalid_policy_message(
            &context.customer_full_name(),
            &context.claim_file_number,
            &context.policy_number,
        );
        let outcome = self
            .notifications
            .notify_customer(&context.notification_email, &message)
            .await;

        let decision = ClaimDecision::rejection(
            context.claim_id,
            "Policy does not cover the claim",
            format!(
                "Automatic rejection: policy {} does not cover claim {}",
                context.policy_number, context.claim_file_number
            ),
        );

        finish_rejection(&self.claims, context, decision, outcome).await
    }
}

/// Rejects a claim on an adjuster's decision
pub struct DecisionRejectionWorker {
    notifications: Arc<NotificationService>,
    claims: Arc<ClaimStoreService>,
}

impl DecisionRejectionWorker {
    pub fn new(notifications: Arc<NotificationService>, claims: Arc<ClaimStoreService>) -> Self {
        Self {
            notifications,
            claims,
        }
    }
}

#[async_trait]
impl TaskWorker for DecisionRejectionWorker {
    fn topic(&self) -> &str {
        TOPIC_CLAIM_REJECT_DECISION
    }

    #[instrument(skip(self, task), fields(task_id = %task.id))]
    async fn execute(&self, task: &LockedTask) -> Result<VariableMap, WorkerError> {
        let request = DecisionRejectionRequest::from_task(task)?;
        let context = &request.context;

        let message = decision_rejection_message(
            &context.customer_full_name(),
            &context.claim_file_number,
            &context.policy_number,
            &request.decision_notes,
        );
        let outcome = self
            .notifications
            .notify_customer(&context.notification_email, &message)
            .await;

        let mut decision = ClaimDecision::rejection(
            context.claim_id,
            "Rejected by adjuster decision",
            request.decision_notes.clone(),
        );
        decision.decided_by_id = Some(request.adjuster_id);

        finish_rejection(&self.claims, context, decision, outcome).await
    }
}
