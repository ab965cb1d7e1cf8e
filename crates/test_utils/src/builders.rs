//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use chrono::{NaiveDate, Utc};
use core_kernel::{AdjusterId, ClaimId, PolicyNumber};
use domain_claims::{
    Claim, ClaimDecision, ClaimStatus, ClaimType, DecisionType, NewClaim,
};
use rust_decimal::Decimal;

use crate::fixtures::{AmountFixtures, DateFixtures, DirectoryFixtures};

/// Builder for claims as the remote store would report them
pub struct ClaimBuilder {
    id: i64,
    claim_type: ClaimType,
    file_number: String,
    policy_number: PolicyNumber,
    description: String,
    incident_date: NaiveDate,
    estimated_amount: Decimal,
    status: ClaimStatus,
    paid_amount: Option<Decimal>,
    adjuster_id: Option<AdjusterId>,
    decision: Option<ClaimDecision>,
}

impl Default for ClaimBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimBuilder {
    /// Creates a builder for a freshly submitted auto claim on P-100
    pub fn new() -> Self {
        Self {
            id: 1,
            claim_type: ClaimType::Auto,
            file_number: "CLM-4711".to_string(),
            policy_number: DirectoryFixtures::policy_p100().policy_number,
            description: "Rear-ended at a stop light".to_string(),
            incident_date: DateFixtures::incident_date(),
            estimated_amount: AmountFixtures::estimate(),
            status: ClaimStatus::Submitted,
            paid_amount: None,
            adjuster_id: None,
            decision: None,
        }
    }

    /// Sets the claim id
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    /// Sets the line of business
    pub fn with_claim_type(mut self, claim_type: ClaimType) -> Self {
        self.claim_type = claim_type;
        self
    }

    /// Sets the file number
    pub fn with_file_number(mut self, file_number: impl Into<String>) -> Self {
        self.file_number = file_number.into();
        self
    }

    /// Sets the policy number
    pub fn with_policy_number(mut self, policy_number: impl Into<String>) -> Self {
        self.policy_number = PolicyNumber::new(policy_number);
        self
    }

    /// Sets the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the damage estimate
    pub fn with_estimated_amount(mut self, amount: Decimal) -> Self {
        self.estimated_amount = amount;
        self
    }

    /// Sets the lifecycle status
    pub fn with_status(mut self, status: ClaimStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the paid amount
    pub fn with_paid_amount(mut self, amount: Decimal) -> Self {
        self.paid_amount = Some(amount);
        self
    }

    /// Sets the assigned adjuster
    pub fn with_adjuster(mut self, adjuster_id: AdjusterId) -> Self {
        self.adjuster_id = Some(adjuster_id);
        self
    }

    /// Attaches a decision
    pub fn with_decision(mut self, decision: ClaimDecision) -> Self {
        self.decision = Some(decision);
        self
    }

    /// Moves the claim into review, assigned to Dana Reyes
    pub fn in_review(self) -> Self {
        let adjuster = DirectoryFixtures::dana_reyes().id;
        self.with_status(ClaimStatus::InReview).with_adjuster(adjuster)
    }

    /// Approves the claim under review
    pub fn approved(self) -> Self {
        self.in_review().with_status(ClaimStatus::Approved)
    }

    /// Builds the claim
    pub fn build(self) -> Claim {
        let now = Utc::now();
        Claim {
            id: ClaimId::new(self.id),
            claim_type: self.claim_type,
            file_number: self.file_number,
            policy_number: self.policy_number,
            description: self.description,
            incident_date: self.incident_date,
            reported_date: DateFixtures::reported_at(),
            estimated_amount: self.estimated_amount,
            status: self.status,
            paid_amount: self.paid_amount,
            adjuster_id: self.adjuster_id,
            decision: self.decision,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builds the creation payload a submission worker would send
    pub fn build_new(self) -> NewClaim {
        NewClaim {
            file_number: self.file_number,
            policy_number: self.policy_number,
            description: self.description,
            incident_date: self.incident_date,
            reported_date: DateFixtures::reported_at(),
            estimated_amount: self.estimated_amount,
            status: self.status,
        }
    }
}

/// Builder for claim decisions
pub struct DecisionBuilder {
    claim_id: i64,
    decision: DecisionType,
    approved_amount: Decimal,
    reasoning: String,
    rejection_reason: String,
    decided_by: Option<(AdjusterId, String)>,
    additional_notes: Option<String>,
}

impl DecisionBuilder {
    /// Creates a builder for an approval with no settled amount yet
    pub fn approval(claim_id: i64) -> Self {
        Self {
            claim_id,
            decision: DecisionType::Approved,
            approved_amount: Decimal::ZERO,
            reasoning: "Covered peril".to_string(),
            rejection_reason: String::new(),
            decided_by: None,
            additional_notes: None,
        }
    }

    /// Creates a builder for a rejection
    pub fn rejection(claim_id: i64) -> Self {
        Self {
            claim_id,
            decision: DecisionType::Rejected,
            approved_amount: Decimal::ZERO,
            reasoning: "No active coverage".to_string(),
            rejection_reason: "Policy does not cover the claim".to_string(),
            decided_by: None,
            additional_notes: None,
        }
    }

    /// Sets the approved amount; ignored on rejections
    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.approved_amount = amount;
        self
    }

    /// Sets the reasoning
    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = reasoning.into();
        self
    }

    /// Sets the rejection reason
    pub fn with_rejection_reason(mut self, reason: impl Into<String>) -> Self {
        self.rejection_reason = reason.into();
        self
    }

    /// Attributes the decision to Dana Reyes
    pub fn by_dana_reyes(self) -> Self {
        let dana = DirectoryFixtures::dana_reyes();
        let name = dana.full_name();
        self.decided_by(dana.id, name)
    }

    /// Attributes the decision to an adjuster
    pub fn decided_by(mut self, adjuster_id: AdjusterId, name: impl Into<String>) -> Self {
        self.decided_by = Some((adjuster_id, name.into()));
        self
    }

    /// Sets additional notes
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.additional_notes = Some(notes.into());
        self
    }

    /// Builds the decision
    pub fn build(self) -> ClaimDecision {
        let claim_id = ClaimId::new(self.claim_id);
        let mut decision = match self.decision {
            DecisionType::Approved => {
                ClaimDecision::approval(claim_id, self.approved_amount, self.reasoning)
            }
            DecisionType::Rejected => {
                ClaimDecision::rejection(claim_id, self.rejection_reason, self.reasoning)
            }
        };
        if let Some((adjuster_id, name)) = self.decided_by {
            decision = decision.decided_by(adjuster_id, name);
        }
        decision.additional_notes = self.additional_notes;
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_claim_builder_defaults() {
        let claim = ClaimBuilder::new().build();
        assert_eq!(claim.id, ClaimId::new(1));
        assert_eq!(claim.claim_type, ClaimType::Auto);
        assert_eq!(claim.policy_number.as_str(), "P-100");
        assert_eq!(claim.status, ClaimStatus::Submitted);
        assert_eq!(claim.estimated_amount, dec!(2500.00));
        assert!(claim.adjuster_id.is_none());
        assert!(claim.decision.is_none());
    }

    #[test]
    fn test_claim_builder_approved_carries_the_adjuster() {
        let claim = ClaimBuilder::new().with_id(42).approved().build();
        assert_eq!(claim.id, ClaimId::new(42));
        assert_eq!(claim.status, ClaimStatus::Approved);
        assert_eq!(claim.adjuster_id, Some(DirectoryFixtures::dana_reyes().id));
    }

    #[test]
    fn test_claim_builder_new_claim_payload() {
        let new_claim = ClaimBuilder::new()
            .with_policy_number("P-200")
            .with_description("Hail damage")
            .build_new();
        assert_eq!(new_claim.policy_number.as_str(), "P-200");
        assert_eq!(new_claim.description, "Hail damage");
        assert_eq!(new_claim.status, ClaimStatus::Submitted);
    }

    #[test]
    fn test_decision_builder_approval_with_attribution() {
        let decision = DecisionBuilder::approval(5)
            .with_amount(dec!(800.00))
            .by_dana_reyes()
            .build();
        assert_eq!(decision.claim_id, ClaimId::new(5));
        assert!(decision.is_approved());
        assert_eq!(decision.approved_amount, dec!(800.00));
        assert_eq!(decision.decided_by_id, Some(DirectoryFixtures::dana_reyes().id));
        assert_eq!(decision.decided_by_name.as_deref(), Some("Dana Reyes"));
    }

    #[test]
    fn test_decision_builder_rejection_never_approves_money() {
        let decision = DecisionBuilder::rejection(5)
            .with_amount(dec!(999.99))
            .with_rejection_reason("Policy lapsed")
            .build();
        assert!(!decision.is_approved());
        assert_eq!(decision.approved_amount, Decimal::ZERO);
        assert_eq!(decision.rejection_reason.as_deref(), Some("Policy lapsed"));
    }
}
