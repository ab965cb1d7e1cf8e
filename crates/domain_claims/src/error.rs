//! Claims domain errors

use thiserror::Error;

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Claim ID must be positive, got {0}")]
    InvalidClaimId(i64),

    #[error("Invalid claim type: {0}")]
    InvalidClaimType(String),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },
}
