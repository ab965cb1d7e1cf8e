//! Adjuster assignment
//!
//! Finds one available external adjuster for a claim and returns the
//! adjuster's identity, so the process can record who was assigned. The
//! claim write itself is delegated to [`ClaimStoreService`], which owns the
//! cache invalidation.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use core_kernel::ClaimId;
use domain_directory::{Adjuster, AdjusterDirectoryPort, EmploymentType};

use crate::claim::ClaimType;
use crate::error::ClaimError;
use crate::store::ClaimStoreService;

/// Selects and assigns an external adjuster by claim type
pub struct AdjusterAssignmentService {
    adjusters: Option<Arc<dyn AdjusterDirectoryPort>>,
    claim_store: Arc<ClaimStoreService>,
}

impl AdjusterAssignmentService {
    /// Creates the service
    pub fn new(
        adjusters: Option<Arc<dyn AdjusterDirectoryPort>>,
        claim_store: Arc<ClaimStoreService>,
    ) -> Self {
        Self {
            adjusters,
            claim_store,
        }
    }

    /// Assigns one available external adjuster to the claim
    ///
    /// Selection is the first adjuster the directory returns for the claim
    /// type's specialization with EXTERNAL employment. Returns `Ok(None)`
    /// when no adjuster is available or the assignment write did not
    /// succeed; whether that is fatal is the caller's call.
    #[instrument(skip(self), fields(claim_type = %claim_type, claim_id = %claim_id))]
    pub async fn assign(
        &self,
        claim_type: ClaimType,
        claim_id: ClaimId,
    ) -> Result<Option<Adjuster>, ClaimError> {
        if !claim_id.is_valid() {
            return Err(ClaimError::InvalidClaimId(claim_id.value()));
        }

        let Some(adjusters) = &self.adjusters else {
            debug!("Adjuster directory not configured, no assignment");
            return Ok(None);
        };

        let pool = match adjusters
            .available_adjusters(claim_type.specialization(), EmploymentType::External)
            .await
        {
            Ok(pool) => pool,
            Err(error) => {
                warn!(%error, "Adjuster pool query failed, no assignment");
                return Ok(None);
            }
        };

        let Some(selected) = pool.first().cloned() else {
            debug!("No external adjuster available for specialization");
            return Ok(None);
        };

        match self
            .claim_store
            .assign_adjuster(claim_type, claim_id, selected.id)
            .await?
        {
            Some(_claim) => Ok(Some(selected)),
            None => Ok(None),
        }
    }
}
