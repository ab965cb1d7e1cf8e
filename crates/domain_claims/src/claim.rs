//! Claim aggregate

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{AdjusterId, ClaimId, PolicyNumber};
use domain_directory::SpecializationArea;

use crate::decision::ClaimDecision;
use crate::error::ClaimError;

/// Line of business a claim belongs to
///
/// Selects which remote endpoint family serves the claim. Parsing is case-
/// and whitespace-insensitive because the values arrive as free-form process
/// variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimType {
    Auto,
    Home,
    Health,
}

impl ClaimType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimType::Auto => "AUTO",
            ClaimType::Home => "HOME",
            ClaimType::Health => "HEALTH",
        }
    }

    /// The adjuster specialization handling this line of business
    pub fn specialization(&self) -> SpecializationArea {
        match self {
            ClaimType::Auto => SpecializationArea::Auto,
            ClaimType::Home => SpecializationArea::Home,
            ClaimType::Health => SpecializationArea::Health,
        }
    }
}

impl fmt::Display for ClaimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ClaimType {
    type Err = ClaimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AUTO" => Ok(ClaimType::Auto),
            "HOME" => Ok(ClaimType::Home),
            "HEALTH" => Ok(ClaimType::Health),
            _ => Err(ClaimError::InvalidClaimType(s.trim().to_string())),
        }
    }
}

/// Claim status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimStatus {
    /// Newly filed, not yet looked at
    Submitted,
    /// Being worked by an adjuster
    InReview,
    /// Approved for payment
    Approved,
    /// Rejected
    Rejected,
    /// Paid out
    Paid,
    /// Settled and archived
    Closed,
}

impl ClaimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Submitted => "SUBMITTED",
            ClaimStatus::InReview => "IN_REVIEW",
            ClaimStatus::Approved => "APPROVED",
            ClaimStatus::Rejected => "REJECTED",
            ClaimStatus::Paid => "PAID",
            ClaimStatus::Closed => "CLOSED",
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A claim as the remote claim store reports it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    /// Unique identifier, assigned by the store
    pub id: ClaimId,
    /// Line of business
    pub claim_type: ClaimType,
    /// Human-readable file number
    pub file_number: String,
    /// The policy the claim is filed against
    pub policy_number: PolicyNumber,
    /// What happened
    pub description: String,
    /// Date of the incident
    pub incident_date: NaiveDate,
    /// When the claim was reported
    pub reported_date: DateTime<Utc>,
    /// Claimant's estimate of the loss
    pub estimated_amount: Decimal,
    /// Lifecycle status
    pub status: ClaimStatus,
    /// Amount paid out, once payment executed
    pub paid_amount: Option<Decimal>,
    /// The adjuster working the claim, once assigned
    pub adjuster_id: Option<AdjusterId>,
    /// The approval or rejection outcome, once decided
    pub decision: Option<ClaimDecision>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Claim {
    /// Updates the status, validating the lifecycle transition
    pub fn update_status(&mut self, status: ClaimStatus) -> Result<(), ClaimError> {
        if !self.can_transition_to(status) {
            return Err(ClaimError::InvalidStatusTransition {
                from: self.status.to_string(),
                to: status.to_string(),
            });
        }
        self.status = status;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Records an executed payment: sets the paid amount and moves to PAID
    pub fn record_payment(&mut self, amount: Decimal) -> Result<(), ClaimError> {
        self.update_status(ClaimStatus::Paid)?;
        self.paid_amount = Some(amount);
        Ok(())
    }

    /// Checks if transition is valid
    ///
    /// A transition to the current status is a no-op success: a redelivered
    /// task re-running its update must not fail.
    fn can_transition_to(&self, target: ClaimStatus) -> bool {
        use ClaimStatus::*;
        if self.status == target {
            return true;
        }
        matches!(
            (self.status, target),
            (Submitted, InReview)
                | (Submitted, Approved)
                | (Submitted, Rejected)
                | (InReview, Approved)
                | (InReview, Rejected)
                | (Approved, Paid)
                | (Paid, Closed)
        )
    }
}

/// Creation payload for a new claim
///
/// The store assigns the id; everything else is set by the creation worker,
/// including the file number and the initial SUBMITTED status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewClaim {
    /// Human-readable file number, generated at creation
    pub file_number: String,
    /// The policy the claim is filed against
    pub policy_number: PolicyNumber,
    /// What happened
    pub description: String,
    /// Date of the incident
    pub incident_date: NaiveDate,
    /// When the claim was reported
    pub reported_date: DateTime<Utc>,
    /// Claimant's estimate of the loss
    pub estimated_amount: Decimal,
    /// Initial lifecycle status
    pub status: ClaimStatus,
}

/// Generates a human-readable claim file number
pub fn generate_file_number() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("CLM-{}", duration.as_millis() % 10_000_000_000)
}
