//! Claims Domain Ports
//!
//! Port interface for the remote claim store. One store serves all three
//! lines of business; every operation takes the [`ClaimType`] so adapters
//! can route to the matching endpoint family.
//!
//! # Adapters
//!
//! - **REST adapter** (`infra_rest`) calls the remote claim store.
//! - **Mock adapter** (the [`mock`] module) keeps claims and decisions in
//!   memory, counts invocations per operation, and can fail selectively, so
//!   tests can pin down which write path broke.

use async_trait::async_trait;

use core_kernel::{AdjusterId, ClaimId, DomainPort, PortError};

use crate::claim::{Claim, ClaimType, NewClaim};
use crate::decision::ClaimDecision;

/// Port for the remote claim store
#[async_trait]
pub trait ClaimStorePort: DomainPort {
    /// Creates a claim and returns it with its store-assigned id
    async fn create_claim(
        &self,
        claim_type: ClaimType,
        new_claim: &NewClaim,
    ) -> Result<Claim, PortError>;

    /// Retrieves a claim by id, decision embedded when one exists
    ///
    /// # Returns
    ///
    /// The claim if found, or `PortError::NotFound`
    async fn get_claim_by_id(&self, claim_type: ClaimType, id: ClaimId)
        -> Result<Claim, PortError>;

    /// Replaces the stored claim and returns the stored result
    async fn update_claim(
        &self,
        claim_type: ClaimType,
        id: ClaimId,
        claim: &Claim,
    ) -> Result<Claim, PortError>;

    /// Writes the adjuster assignment onto the claim
    async fn assign_adjuster(
        &self,
        claim_type: ClaimType,
        claim_id: ClaimId,
        adjuster_id: AdjusterId,
    ) -> Result<Claim, PortError>;

    /// Persists a new decision for the claim named in the decision
    async fn create_decision(
        &self,
        claim_type: ClaimType,
        decision: &ClaimDecision,
    ) -> Result<ClaimDecision, PortError>;

    /// Replaces the existing decision for the claim named in the decision
    async fn update_decision(
        &self,
        claim_type: ClaimType,
        decision: &ClaimDecision,
    ) -> Result<ClaimDecision, PortError>;
}

/// Mock implementation for testing
///
/// In-memory claim store that records per-operation call counts and can be
/// switched into failing states, wholesale or per write path.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use crate::claim::ClaimStatus;

    /// In-memory mock implementation of ClaimStorePort
    ///
    /// Claims and decisions live in separate maps keyed by line of business
    /// and claim id, mirroring the remote store's endpoint families. Reads
    /// embed the decision the way the remote payload does.
    #[derive(Debug)]
    pub struct MockClaimStore {
        claims: Arc<RwLock<HashMap<(ClaimType, i64), Claim>>>,
        decisions: Arc<RwLock<HashMap<(ClaimType, i64), ClaimDecision>>>,
        next_id: AtomicI64,
        create_calls: AtomicU64,
        get_calls: AtomicU64,
        update_calls: AtomicU64,
        assign_calls: AtomicU64,
        decision_create_calls: AtomicU64,
        decision_update_calls: AtomicU64,
        failing: AtomicBool,
        assignment_failing: AtomicBool,
        decision_writes_failing: AtomicBool,
    }

    impl Default for MockClaimStore {
        fn default() -> Self {
            Self {
                claims: Arc::new(RwLock::new(HashMap::new())),
                decisions: Arc::new(RwLock::new(HashMap::new())),
                next_id: AtomicI64::new(1),
                create_calls: AtomicU64::new(0),
                get_calls: AtomicU64::new(0),
                update_calls: AtomicU64::new(0),
                assign_calls: AtomicU64::new(0),
                decision_create_calls: AtomicU64::new(0),
                decision_update_calls: AtomicU64::new(0),
                failing: AtomicBool::new(false),
                assignment_failing: AtomicBool::new(false),
                decision_writes_failing: AtomicBool::new(false),
            }
        }
    }

    impl MockClaimStore {
        /// Creates an empty mock store
        pub fn new() -> Self {
            Self::default()
        }

        /// The claim as currently stored, without the embedded decision
        pub async fn stored_claim(&self, claim_type: ClaimType, id: i64) -> Option<Claim> {
            self.claims.read().await.get(&(claim_type, id)).cloned()
        }

        /// The decision as currently stored
        pub async fn stored_decision(
            &self,
            claim_type: ClaimType,
            claim_id: i64,
        ) -> Option<ClaimDecision> {
            self.decisions
                .read()
                .await
                .get(&(claim_type, claim_id))
                .cloned()
        }

        pub fn create_calls(&self) -> u64 {
            self.create_calls.load(Ordering::SeqCst)
        }

        pub fn get_calls(&self) -> u64 {
            self.get_calls.load(Ordering::SeqCst)
        }

        pub fn update_calls(&self) -> u64 {
            self.update_calls.load(Ordering::SeqCst)
        }

        pub fn assign_calls(&self) -> u64 {
            self.assign_calls.load(Ordering::SeqCst)
        }

        pub fn decision_create_calls(&self) -> u64 {
            self.decision_create_calls.load(Ordering::SeqCst)
        }

        pub fn decision_update_calls(&self) -> u64 {
            self.decision_update_calls.load(Ordering::SeqCst)
        }

        /// Makes every subsequent call fail with a connection error
        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        /// Makes only adjuster assignment writes fail
        pub fn set_assignment_failing(&self, failing: bool) {
            self.assignment_failing.store(failing, Ordering::SeqCst);
        }

        /// Makes only decision writes fail
        pub fn set_decision_writes_failing(&self, failing: bool) {
            self.decision_writes_failing.store(failing, Ordering::SeqCst);
        }

        fn check_up(&self) -> Result<(), PortError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(PortError::connection("claim store unreachable"));
            }
            Ok(())
        }

        async fn with_decision(&self, mut claim: Claim) -> Claim {
            let key = (claim.claim_type, claim.id.value());
            if let Some(decision) = self.decisions.read().await.get(&key) {
                claim.decision = Some(decision.clone());
            }
            claim
        }
    }

    impl DomainPort for MockClaimStore {}

    #[async_trait]
    impl ClaimStorePort for MockClaimStore {
        async fn create_claim(
            &self,
            claim_type: ClaimType,
            new_claim: &NewClaim,
        ) -> Result<Claim, PortError> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            self.check_up()?;

            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            let now = Utc::now();
            let claim = Claim {
                id: ClaimId::new(id),
                claim_type,
                file_number: new_claim.file_number.clone(),
                policy_number: new_claim.policy_number.clone(),
                description: new_claim.description.clone(),
                incident_date: new_claim.incident_date,
                reported_date: new_claim.reported_date,
                estimated_amount: new_claim.estimated_amount,
                status: new_claim.status,
                paid_amount: None,
                adjuster_id: None,
                decision: None,
                created_at: now,
                updated_at: now,
            };
            self.claims
                .write()
                .await
                .insert((claim_type, id), claim.clone());
            Ok(claim)
        }

        async fn get_claim_by_id(
            &self,
            claim_type: ClaimType,
            id: ClaimId,
        ) -> Result<Claim, PortError> {
            self.get_calls.fetch_add(1, Ordering::SeqCst);
            self.check_up()?;

            let claim = self
                .claims
                .read()
                .await
                .get(&(claim_type, id.value()))
                .cloned()
                .ok_or_else(|| PortError::not_found("Claim", id))?;
            Ok(self.with_decision(claim).await)
        }

        async fn update_claim(
            &self,
            claim_type: ClaimType,
            id: ClaimId,
            claim: &Claim,
        ) -> Result<Claim, PortError> {
            self.update_calls.fetch_add(1, Ordering::SeqCst);
            self.check_up()?;

            let mut guard = self.claims.write().await;
            if !guard.contains_key(&(claim_type, id.value())) {
                return Err(PortError::not_found("Claim", id));
            }
            let mut stored = claim.clone();
            stored.updated_at = Utc::now();
            guard.insert((claim_type, id.value()), stored.clone());
            drop(guard);
            Ok(self.with_decision(stored).await)
        }

        async fn assign_adjuster(
            &self,
            claim_type: ClaimType,
            claim_id: ClaimId,
            adjuster_id: AdjusterId,
        ) -> Result<Claim, PortError> {
            self.assign_calls.fetch_add(1, Ordering::SeqCst);
            self.check_up()?;
            if self.assignment_failing.load(Ordering::SeqCst) {
                return Err(PortError::connection("claim store rejected assignment"));
            }

            let mut guard = self.claims.write().await;
            let claim = guard
                .get_mut(&(claim_type, claim_id.value()))
                .ok_or_else(|| PortError::not_found("Claim", claim_id))?;
            claim.adjuster_id = Some(adjuster_id);
            claim.status = ClaimStatus::InReview;
            claim.updated_at = Utc::now();
            let updated = claim.clone();
            drop(guard);
            Ok(self.with_decision(updated).await)
        }

        async fn create_decision(
            &self,
            claim_type: ClaimType,
            decision: &ClaimDecision,
        ) -> Result<ClaimDecision, PortError> {
            self.decision_create_calls.fetch_add(1, Ordering::SeqCst);
            self.check_up()?;
            if self.decision_writes_failing.load(Ordering::SeqCst) {
                return Err(PortError::connection("claim store rejected decision write"));
            }

            // Upsert: a redelivered task re-creating the same decision succeeds.
            self.decisions
                .write()
                .await
                .insert((claim_type, decision.claim_id.value()), decision.clone());
            Ok(decision.clone())
        }

        async fn update_decision(
            &self,
            claim_type: ClaimType,
            decision: &ClaimDecision,
        ) -> Result<ClaimDecision, PortError> {
            self.decision_update_calls.fetch_add(1, Ordering::SeqCst);
            self.check_up()?;
            if self.decision_writes_failing.load(Ordering::SeqCst) {
                return Err(PortError::connection("claim store rejected decision write"));
            }

            let mut guard = self.decisions.write().await;
            let key = (claim_type, decision.claim_id.value());
            if !guard.contains_key(&key) {
                return Err(PortError::not_found("ClaimDecision", decision.claim_id));
            }
            guard.insert(key, decision.clone());
            Ok(decision.clone())
        }
    }
}
