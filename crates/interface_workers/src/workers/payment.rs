//! Payment workers
//!
//! Calculation amends the claim's existing decision with the settled
//! amount; execution marks the claim PAID. Both refuse to run against a
//! claim that is not in the state the process says it should be in, and
//! leave the retry to the queue.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument};

use domain_claims::{ClaimStoreService, SettlementRatio};
use infra_queue::{LockedTask, TaskWorker, VariableMap, WorkerError};

use crate::requests::{vars, PaymentCalculationRequest, PaymentExecutionRequest};
use crate::workers::{
    claim_error, TOPIC_PAYMENT_CALCULATE_FULL, TOPIC_PAYMENT_CALCULATE_PARTIAL,
    TOPIC_PAYMENT_EXECUTE,
};

/// Settles an invoice against the claim's decision, full or partial
///
/// One worker type serves both topics; the ratio is fixed per instance at
/// registration time.
pub struct PaymentCalculationWorker {
    claims: Arc<ClaimStoreService>,
    ratio: SettlementRatio,
    topic: &'static str,
}

impl PaymentCalculationWorker {
    /// Worker for the full-settlement topic
    pub fn full(claims: Arc<ClaimStoreService>) -> Self {
        Self {
            claims,
            ratio: SettlementRatio::Full,
            topic: TOPIC_PAYMENT_CALCULATE_FULL,
        }
    }

    /// Worker for the partial-settlement topic
    pub fn partial(claims: Arc<ClaimStoreService>) -> Self {
        Self {
            claims,
            ratio: SettlementRatio::Partial,
            topic: TOPIC_PAYMENT_CALCULATE_PARTIAL,
        }
    }
}

#[async_trait]
impl TaskWorker for PaymentCalculationWorker {
    fn topic(&self) -> &str {
        self.topic
    }

    #[instrument(skip(self, task), fields(task_id = %task.id, ratio = self.ratio.label()))]
    async fn execute(&self, task: &LockedTask) -> Result<VariableMap, WorkerError> {
        let request = PaymentCalculationRequest::from_task(task)?;

        let claim = self
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

        let mut decision = claim.decision.ok_or_else(|| {
            WorkerError::invariant(format!(
                "Claim {} has no decision to settle",
                request.claim_id
            ))
        })?;

        let approved = self.ratio.approved_amount(request.invoice_amount);
        decision.attach_approved_amount(approved, request.invoice_details.unwrap_or_default());

        self.claims
            .update_decision(&decision, request.claim_type)
            .await
            .map_err(claim_error)?
            .ok_or_else(|| {
                WorkerError::execution(format!(
                    "Failed to update decision for claim {}",
                    request.claim_id
                ))
            })?;

        info!(
            claim_id = %request.claim_id,
            invoice_amount = %request.invoice_amount,
            approved_amount = %approved,
            "Settlement calculated"
        );

        Ok(VariableMap::new().with_decimal(vars::APPROVED_AMOUNT, approved))
    }
}

/// Pays out the approved amount and closes the payment step
pub struct PaymentExecutionWorker {
    claims: Arc<ClaimStoreService>,
}

impl PaymentExecutionWorker {
    pub fn new(claims: Arc<ClaimStoreService>) -> Self {
        Self { claims }
    }
}

#[async_trait]
impl TaskWorker for PaymentExecutionWorker {
    fn topic(&self) -> &str {
        TOPIC_PAYMENT_EXECUTE
    }

    #[instrument(skip(self, task), fields(task_id = %task.id))]
    async fn execute(&self, task: &LockedTask) -> Result<VariableMap, WorkerError> {
        let request = PaymentExecutionRequest::from_task(task)?;

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

        claim
            .record_payment(request.approved_amount)
            .map_err(claim_error)?;

        let updated = self
            .claims
            .update(request.claim_type, request.claim_id, &claim)
            .await
            .map_err(claim_error)?
            .ok_or_else(|| {
                WorkerError::execution(format!(
                    "Failed to update {} claim {}",
                    request.claim_type, request.claim_id
                ))
            })?;

        info!(
            claim_id = %request.claim_id,
            paid_amount = %request.approved_amount,
            "Payment executed"
        );

        Ok(VariableMap::new()
            .with(vars::PAYMENT_EXECUTED, true)
            .with_decimal(vars::PAID_AMOUNT, request.approved_amount)
            .with(vars::CLAIM_STATUS, updated.status.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use core_kernel::{ClaimId, InMemoryCache, PolicyNumber};
    use domain_claims::ports::ClaimStorePort;
    use domain_claims::{
        ClaimDecision, ClaimStatus, ClaimType, MockClaimStore, NewClaim,
    };
    use test_utils::amount_strategy;

    fn claim_store(store: Arc<MockClaimStore>) -> Arc<ClaimStoreService> {
        Arc::new(ClaimStoreService::new(
            Some(store),
            Arc::new(InMemoryCache::new()),
        ))
    }

    async fn seeded_claim(store: &MockClaimStore, status: ClaimStatus) -> i64 {
        let claim = store
            .create_claim(
                ClaimType::Auto,
                &NewClaim {
                    file_number: "CLM-80".to_string(),
                    policy_number: PolicyNumber::new("P-80"),
                    description: "Windshield replacement".to_string(),
                    incident_date: NaiveDate::from_ymd_opt(2025, 5, 17).unwrap(),
                    reported_date: Utc::now(),
                    estimated_amount: dec!(1100),
                    status: ClaimStatus::Submitted,
                },
            )
            .await
            .unwrap();
        if status != ClaimStatus::Submitted {
            let mut updated = claim.clone();
            updated.status = status;
            store
                .update_claim(ClaimType::Auto, claim.id, &updated)
                .await
                .unwrap();
        }
        claim.id.value()
    }

    async fn seed_approval(store: &MockClaimStore, claim_id: i64) {
        let decision =
            ClaimDecision::approval(ClaimId::new(claim_id), Decimal::ZERO, "Repair approved");
        store
            .create_decision(ClaimType::Auto, &decision)
            .await
            .unwrap();
    }

    fn calculation_task(claim_id: i64, invoice: &str) -> LockedTask {
        LockedTask::new(
            "t-calc",
            TOPIC_PAYMENT_CALCULATE_PARTIAL,
            VariableMap::new()
                .with(vars::CLAIM_ID, claim_id)
                .with(vars::CLAIM_TYPE, "AUTO")
                .with(vars::INVOICE_AMOUNT, invoice)
                .with(vars::INVOICE_DETAILS, "Invoice 2025-0117, bodywork"),
        )
    }

    #[tokio::test]
    async fn test_partial_settlement_outputs_eighty_percent() {
        let store = Arc::new(MockClaimStore::new());
        let claim_id = seeded_claim(&store, ClaimStatus::Submitted).await;
        seed_approval(&store, claim_id).await;
        let worker = PaymentCalculationWorker::partial(claim_store(Arc::clone(&store)));

        let output = worker
            .execute(&calculation_task(claim_id, "1000.00"))
            .await
            .unwrap();

        assert_eq!(output.require_decimal(vars::APPROVED_AMOUNT).unwrap(), dec!(800.00));

        let decision = store
            .stored_decision(ClaimType::Auto, claim_id)
            .await
            .unwrap();
        assert_eq!(decision.approved_amount, dec!(800.00));
        assert_eq!(
            decision.additional_notes.as_deref(),
            Some("Invoice 2025-0117, bodywork")
        );
    }

    #[tokio::test]
    async fn test_full_settlement_pays_invoice_exactly() {
        let store = Arc::new(MockClaimStore::new());
        let claim_id = seeded_claim(&store, ClaimStatus::Submitted).await;
        seed_approval(&store, claim_id).await;
        let worker = PaymentCalculationWorker::full(claim_store(Arc::clone(&store)));

        let output = worker
            .execute(&calculation_task(claim_id, "1234.56"))
            .await
            .unwrap();

        assert_eq!(
            output.require_decimal(vars::APPROVED_AMOUNT).unwrap(),
            dec!(1234.56)
        );
    }

    #[tokio::test]
    async fn test_settlement_without_decision_is_invariant_failure() {
        let store = Arc::new(MockClaimStore::new());
        let claim_id = seeded_claim(&store, ClaimStatus::Submitted).await;
        let worker = PaymentCalculationWorker::partial(claim_store(Arc::clone(&store)));

        let error = worker
            .execute(&calculation_task(claim_id, "1000.00"))
            .await
            .unwrap_err();

        assert_eq!(
            error.to_string(),
            format!("Claim {claim_id} has no decision to settle")
        );
        assert_eq!(store.decision_update_calls(), 0);
    }

    #[tokio::test]
    async fn test_execution_marks_claim_paid() {
        let store = Arc::new(MockClaimStore::new());
        let claim_id = seeded_claim(&store, ClaimStatus::Approved).await;
        let worker = PaymentExecutionWorker::new(claim_store(Arc::clone(&store)));
        let task = LockedTask::new(
            "t-pay",
            TOPIC_PAYMENT_EXECUTE,
            VariableMap::new()
                .with(vars::CLAIM_ID, claim_id)
                .with(vars::CLAIM_TYPE, "AUTO")
                .with(vars::APPROVED_AMOUNT, "800.00"),
        );

        let output = worker.execute(&task).await.unwrap();

        assert_eq!(output.opt_bool(vars::PAYMENT_EXECUTED), Some(true));
        assert_eq!(output.require_decimal(vars::PAID_AMOUNT).unwrap(), dec!(800.00));
        assert_eq!(output.opt_str(vars::CLAIM_STATUS), Some("PAID"));

        let stored = store.stored_claim(ClaimType::Auto, claim_id).await.unwrap();
        assert_eq!(stored.status, ClaimStatus::Paid);
        assert_eq!(stored.paid_amount, Some(dec!(800.00)));
    }

    #[tokio::test]
    async fn test_execution_refuses_unapproved_claim() {
        let store = Arc::new(MockClaimStore::new());
        let claim_id = seeded_claim(&store, ClaimStatus::Rejected).await;
        let worker = PaymentExecutionWorker::new(claim_store(Arc::clone(&store)));
        let task = LockedTask::new(
            "t-pay",
            TOPIC_PAYMENT_EXECUTE,
            VariableMap::new()
                .with(vars::CLAIM_ID, claim_id)
                .with(vars::CLAIM_TYPE, "AUTO")
                .with(vars::APPROVED_AMOUNT, "800.00"),
        );

        let error = worker.execute(&task).await.unwrap_err();

        assert_eq!(
            error.to_string(),
            "Invalid status transition from REJECTED to PAID"
        );
        assert_eq!(store.update_calls(), 1);
    }

    proptest! {
        // Payment execution validates approved_amount > 0, so a calculation
        // over any accepted invoice must hand it an amount it will accept.
        #[test]
        fn prop_partial_output_passes_execution_validation(invoice in amount_strategy()) {
            let approved = SettlementRatio::Partial.approved_amount(invoice);
            prop_assert!(approved > Decimal::ZERO);
        }
    }
}
