//! Claims Worker Interface
//!
//! The external-task workers that drive the claim lifecycle: creation,
//! adjuster assignment, repair approval, the two rejection paths, and
//! settlement with payout. Each worker owns one queue topic; the
//! [`infra_queue`] host polls the topics and dispatches locked tasks into
//! the [`workers`] here.
//!
//! Inputs arrive as free-form process variables and are parsed into the
//! typed requests in [`requests`] before any side effect; everything a
//! worker then does goes through the domain services, which own caching,
//! degraded-mode behavior, and the claim lifecycle rules.

pub mod config;
pub mod requests;
pub mod workers;

use std::sync::Arc;

use domain_claims::{AdjusterAssignmentService, ClaimStoreService};
use domain_directory::{CustomerLookupService, NotificationService, PolicyLookupService};
use infra_queue::{HostError, WorkerHost};

use workers::{
    AdjusterAssignmentWorker, ClaimCreateWorker, DecisionRejectionWorker,
    InvalidPolicyRejectionWorker, PaymentCalculationWorker, PaymentExecutionWorker,
    RepairApprovalWorker,
};

pub use config::WorkerConfig;

/// The domain services the workers share
///
/// Built once at startup and cloned into each worker; the services are the
/// single place holding caches and remote ports, so every worker observes
/// the same state.
pub struct WorkerServices {
    pub claims: Arc<ClaimStoreService>,
    pub assignments: Arc<AdjusterAssignmentService>,
    pub customers: Arc<CustomerLookupService>,
    pub policies: Arc<PolicyLookupService>,
    pub notifications: Arc<NotificationService>,
}

impl WorkerServices {
    /// Registers every topic worker on the host
    pub fn register_all(&self, host: &mut WorkerHost) -> Result<(), HostError> {
        host.register(Arc::new(ClaimCreateWorker::new(
            Arc::clone(&self.policies),
            Arc::clone(&self.customers),
            Arc::clone(&self.claims),
        )))?;
        host.register(Arc::new(AdjusterAssignmentWorker::new(Arc::clone(
            &self.assignments,
        ))))?;
        host.register(Arc::new(RepairApprovalWorker::new(Arc::clone(
            &self.claims,
        ))))?;
        host.register(Arc::new(InvalidPolicyRejectionWorker::new(
            Arc::clone(&self.policies),
            Arc::clone(&self.notifications),
            Arc::clone(&self.claims),
        )))?;
        host.register(Arc::new(DecisionRejectionWorker::new(
            Arc::clone(&self.notifications),
            Arc::clone(&self.claims),
        )))?;
        host.register(Arc::new(PaymentCalculationWorker::full(Arc::clone(
            &self.claims,
        ))))?;
        host.register(Arc::new(PaymentCalculationWorker::partial(Arc::clone(
            &self.claims,
        ))))?;
        host.register(Arc::new(PaymentExecutionWorker::new(Arc::clone(
            &self.claims,
        ))))?;
        Ok(())
    }
}
