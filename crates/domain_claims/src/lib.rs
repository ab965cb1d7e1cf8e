//! Claims Domain
//!
//! This crate implements the claim lifecycle the workers drive: creation,
//! adjuster assignment, approval, rejection decisions, and settlement.
//!
//! # Claim Lifecycle
//!
//! ```text
//! Submitted -> In Review -> Approved -> Paid -> Closed
//!                 \-> Rejected
//! ```
//!
//! All claim state lives in the remote claim store; this crate's
//! [`ClaimStoreService`] is the sole write path to it and owns the cache in
//! front of it. Remote failures degrade to empty results (see
//! [`store`]); the callers decide whether an empty result is fatal.

pub mod assignment;
pub mod claim;
pub mod decision;
pub mod error;
pub mod ports;
pub mod settlement;
pub mod store;

pub use assignment::AdjusterAssignmentService;
pub use claim::{generate_file_number, Claim, ClaimStatus, ClaimType, NewClaim};
pub use decision::{ClaimDecision, DecisionType};
pub use error::ClaimError;
pub use ports::ClaimStorePort;
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockClaimStore;
pub use settlement::SettlementRatio;
pub use store::{ClaimCacheKey, ClaimStoreService};
