//! Topic workers
//!
//! One worker per queue topic, each a thin orchestration over the domain
//! services: extract a typed request, call the services, shape the output
//! variables. All business rules live in the domain crates; the workers
//! decide only what a failure is called and which variables flow back to
//! the process.

use domain_claims::ClaimError;
use domain_directory::DirectoryError;
use infra_queue::WorkerError;

mod approve;
mod assign;
mod create;
mod payment;
mod reject;

pub use approve::RepairApprovalWorker;
pub use assign::AdjusterAssignmentWorker;
pub use create::ClaimCreateWorker;
pub use payment::{PaymentCalculationWorker, PaymentExecutionWorker};
pub use reject::{DecisionRejectionWorker, InvalidPolicyRejectionWorker};

pub const TOPIC_CLAIM_CREATE: &str = "claim-create";
pub const TOPIC_CLAIM_ASSIGN_ADJUSTER: &str = "claim-assign-adjuster";
pub const TOPIC_CLAIM_APPROVE_REPAIR: &str = "claim-approve-repair";
pub const TOPIC_CLAIM_REJECT_INVALID_POLICY: &str = "claim-reject-invalid-policy";
pub const TOPIC_CLAIM_REJECT_DECISION: &str = "claim-reject-decision";
pub const TOPIC_PAYMENT_CALCULATE_FULL: &str = "payment-calculate-full";
pub const TOPIC_PAYMENT_CALCULATE_PARTIAL: &str = "payment-calculate-partial";
pub const TOPIC_PAYMENT_EXECUTE: &str = "payment-execute";

/// Maps a claims-domain guard error onto the worker failure stages
pub(crate) fn claim_error(error: ClaimError) -> WorkerError {
    match error {
        ClaimError::InvalidClaimId(_) | ClaimError::InvalidClaimType(_) => {
            WorkerError::validation(error.to_string())
        }
        ClaimError::InvalidStatusTransition { .. } => WorkerError::invariant(error.to_string()),
    }
}

/// Maps a directory-domain guard error onto a validation failure
pub(crate) fn directory_error(error: DirectoryError) -> WorkerError {
    WorkerError::validation(error.to_string())
}
