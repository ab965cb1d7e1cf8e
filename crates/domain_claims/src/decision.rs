//! Claim decisions
//!
//! A decision records the approval or rejection outcome for a claim. The
//! remote store keeps decisions alongside claims and embeds them in the
//! claim payloads it returns, so decision writes must invalidate any cached
//! copy of the owning claim.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{AdjusterId, ClaimId};

/// Outcome kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionType {
    Approved,
    Rejected,
}

impl DecisionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionType::Approved => "APPROVED",
            DecisionType::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for DecisionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The approval or rejection record for a claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimDecision {
    /// The claim this decision belongs to
    pub claim_id: ClaimId,
    /// Approved or rejected
    pub decision: DecisionType,
    /// When the decision was made
    pub decision_date: DateTime<Utc>,
    /// The adjuster who decided, when known
    pub decided_by_id: Option<AdjusterId>,
    /// Display name of the decider, when known
    pub decided_by_name: Option<String>,
    /// Amount approved for payment, zero for rejections
    pub approved_amount: Decimal,
    /// Free-form reasoning behind the outcome
    pub reasoning: Option<String>,
    /// Rejection cause, set only for rejections
    pub rejection_reason: Option<String>,
    /// Notes appended by later processing steps
    pub additional_notes: Option<String>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl ClaimDecision {
    /// Builds an approval for the given claim
    pub fn approval(claim_id: ClaimId, approved_amount: Decimal, reasoning: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            claim_id,
            decision: DecisionType::Approved,
            decision_date: now,
            decided_by_id: None,
            decided_by_name: None,
            approved_amount,
            reasoning: Some(reasoning.into()),
            rejection_reason: None,
            additional_notes: None,
            updated_at: now,
        }
    }

    /// Builds a rejection for the given claim
    ///
    /// Rejections never approve money, so the approved amount is zero.
    pub fn rejection(
        claim_id: ClaimId,
        reason: impl Into<String>,
        reasoning: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            claim_id,
            decision: DecisionType::Rejected,
            decision_date: now,
            decided_by_id: None,
            decided_by_name: None,
            approved_amount: Decimal::ZERO,
            reasoning: Some(reasoning.into()),
            rejection_reason: Some(reason.into()),
            additional_notes: None,
            updated_at: now,
        }
    }

    /// Attributes the decision to an adjuster
    pub fn decided_by(mut self, id: AdjusterId, name: impl Into<String>) -> Self {
        self.decided_by_id = Some(id);
        self.decided_by_name = Some(name.into());
        self
    }

    /// Sets the settled amount and attaches calculation notes
    ///
    /// Used by the payment calculation workers to amend an existing approval
    /// with the final approved amount.
    pub fn attach_approved_amount(&mut self, amount: Decimal, notes: impl Into<String>) {
        self.approved_amount = amount;
        self.additional_notes = Some(notes.into());
        self.updated_at = Utc::now();
    }

    pub fn is_approved(&self) -> bool {
        self.decision == DecisionType::Approved
    }
}
