//! Claim store service
//!
//! The sole write path to the remote claim store, with a read-through cache
//! in front of claim reads. The cache stores confirmed not-found results as
//! well, and every successful write synchronously invalidates the touched
//! claim's entry, so a read after a write never serves the pre-write value.
//!
//! The degraded-mode policy matches the directory services: remote
//! transport failures and unconfigured ports are logged and converted into
//! empty results. The only errors raised are guard violations on the
//! caller's input, which fire before any cache or remote access.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use core_kernel::{AdjusterId, CacheEntry, ClaimId, EntityCache};

use crate::claim::{Claim, ClaimType, NewClaim};
use crate::decision::ClaimDecision;
use crate::error::ClaimError;
use crate::ports::ClaimStorePort;

/// Cache key for claim entries
///
/// Claim ids are only unique within a line of business, so the type is part
/// of the key.
pub type ClaimCacheKey = (ClaimType, ClaimId);

/// Cached CRUD and decision management for AUTO, HOME, and HEALTH claims
pub struct ClaimStoreService {
    store: Option<Arc<dyn ClaimStorePort>>,
    cache: Arc<dyn EntityCache<ClaimCacheKey, Claim>>,
}

impl ClaimStoreService {
    /// Creates the service
    ///
    /// Passing `None` for the store leaves every operation in degraded
    /// mode: it logs and returns an empty result.
    pub fn new(
        store: Option<Arc<dyn ClaimStorePort>>,
        cache: Arc<dyn EntityCache<ClaimCacheKey, Claim>>,
    ) -> Self {
        Self { store, cache }
    }

    /// Creates a claim in the remote store
    ///
    /// Returns `None` when the store is unconfigured or the remote call
    /// failed; callers decide whether that is fatal.
    #[instrument(skip(self, new_claim), fields(claim_type = %claim_type))]
    pub async fn create(&self, claim_type: ClaimType, new_claim: &NewClaim) -> Option<Claim> {
        let Some(store) = &self.store else {
            debug!("Claim store not configured, create skipped");
            return None;
        };

        match store.create_claim(claim_type, new_claim).await {
            Ok(claim) => {
                self.cache.invalidate(&(claim_type, claim.id));
                Some(claim)
            }
            Err(error) => {
                warn!(%error, "Claim create failed, degrading to empty result");
                None
            }
        }
    }

    /// Looks up a claim by id through the cache
    ///
    /// A confirmed not-found is cached; a transport failure is not, so the
    /// next lookup retries the remote store.
    #[instrument(skip(self), fields(claim_type = %claim_type, claim_id = %id))]
    pub async fn get_by_id(
        &self,
        claim_type: ClaimType,
        id: ClaimId,
    ) -> Result<Option<Claim>, ClaimError> {
        if !id.is_valid() {
            return Err(ClaimError::InvalidClaimId(id.value()));
        }

        let key = (claim_type, id);
        if let Some(entry) = self.cache.get(&key) {
            debug!("Claim served from cache");
            return Ok(entry.into_option());
        }

        let Some(store) = &self.store else {
            debug!("Claim store not configured, returning empty result");
            return Ok(None);
        };

        match store.get_claim_by_id(claim_type, id).await {
            Ok(claim) => {
                self.cache.put(key, CacheEntry::Found(claim.clone()));
                Ok(Some(claim))
            }
            Err(error) if error.is_not_found() => {
                self.cache.put(key, CacheEntry::Missing);
                Ok(None)
            }
            Err(error) => {
                warn!(%error, "Claim lookup failed, degrading to empty result");
                Ok(None)
            }
        }
    }

    /// Replaces the stored claim, invalidating its cache entry on success
    #[instrument(skip(self, claim), fields(claim_type = %claim_type, claim_id = %id))]
    pub async fn update(
        &self,
        claim_type: ClaimType,
        id: ClaimId,
        claim: &Claim,
    ) -> Result<Option<Claim>, ClaimError> {
        if !id.is_valid() {
            return Err(ClaimError::InvalidClaimId(id.value()));
        }

        let Some(store) = &self.store else {
            debug!("Claim store not configured, update skipped");
            return Ok(None);
        };

        match store.update_claim(claim_type, id, claim).await {
            Ok(updated) => {
                self.cache.invalidate(&(claim_type, id));
                Ok(Some(updated))
            }
            Err(error) => {
                warn!(%error, "Claim update failed, degrading to empty result");
                Ok(None)
            }
        }
    }

    /// Writes an adjuster assignment, invalidating the claim's cache entry
    ///
    /// Which adjuster to assign is the caller's decision; this method only
    /// persists it. Returns `Ok(None)` when the store is unconfigured or
    /// the write failed.
    #[instrument(
        skip(self),
        fields(claim_type = %claim_type, claim_id = %claim_id, adjuster_id = %adjuster_id)
    )]
    pub async fn assign_adjuster(
        &self,
        claim_type: ClaimType,
        claim_id: ClaimId,
        adjuster_id: AdjusterId,
    ) -> Result<Option<Claim>, ClaimError> {
        if !claim_id.is_valid() {
            return Err(ClaimError::InvalidClaimId(claim_id.value()));
        }

        let Some(store) = &self.store else {
            debug!("Claim store not configured, assignment skipped");
            return Ok(None);
        };

        match store.assign_adjuster(claim_type, claim_id, adjuster_id).await {
            Ok(claim) => {
                self.cache.invalidate(&(claim_type, claim_id));
                Ok(Some(claim))
            }
            Err(error) => {
                warn!(%error, "Adjuster assignment write failed, degrading to empty result");
                Ok(None)
            }
        }
    }

    /// Persists a new decision, invalidating the owning claim's cache entry
    ///
    /// The remote store embeds decisions in claim payloads, so a stale
    /// cached claim would otherwise keep serving the pre-decision state.
    #[instrument(skip(self, decision), fields(claim_type = %claim_type, claim_id = %decision.claim_id))]
    pub async fn create_decision(
        &self,
        decision: &ClaimDecision,
        claim_type: ClaimType,
    ) -> Result<Option<ClaimDecision>, ClaimError> {
        if !decision.claim_id.is_valid() {
            return Err(ClaimError::InvalidClaimId(decision.claim_id.value()));
        }

        let Some(store) = &self.store else {
            debug!("Claim store not configured, decision create skipped");
            return Ok(None);
        };

        match store.create_decision(claim_type, decision).await {
            Ok(created) => {
                self.cache.invalidate(&(claim_type, decision.claim_id));
                Ok(Some(created))
            }
            Err(error) => {
                warn!(%error, "Decision create failed, degrading to empty result");
                Ok(None)
            }
        }
    }

    /// Replaces the existing decision, invalidating the owning claim's
    /// cache entry
    #[instrument(skip(self, decision), fields(claim_type = %claim_type, claim_id = %decision.claim_id))]
    pub async fn update_decision(
        &self,
        decision: &ClaimDecision,
        claim_type: ClaimType,
    ) -> Result<Option<ClaimDecision>, ClaimError> {
        if !decision.claim_id.is_valid() {
            return Err(ClaimError::InvalidClaimId(decision.claim_id.value()));
        }

        let Some(store) = &self.store else {
            debug!("Claim store not configured, decision update skipped");
            return Ok(None);
        };

        match store.update_decision(claim_type, decision).await {
            Ok(updated) => {
                self.cache.invalidate(&(claim_type, decision.claim_id));
                Ok(Some(updated))
            }
            Err(error) => {
                warn!(%error, "Decision update failed, degrading to empty result");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::ClaimStatus;
    use crate::ports::mock::MockClaimStore;
    use chrono::{NaiveDate, Utc};
    use core_kernel::{AdjusterId, InMemoryCache, PolicyNumber};
    use rust_decimal_macros::dec;

    fn new_claim() -> NewClaim {
        NewClaim {
            file_number: "CLM-7".to_string(),
            policy_number: PolicyNumber::new("P-1"),
            description: "Burst pipe".to_string(),
            incident_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            reported_date: Utc::now(),
            estimated_amount: dec!(3200),
            status: ClaimStatus::Submitted,
        }
    }

    fn service_over(store: Option<Arc<MockClaimStore>>) -> ClaimStoreService {
        let cache: Arc<dyn EntityCache<ClaimCacheKey, Claim>> = Arc::new(InMemoryCache::new());
        ClaimStoreService::new(store.map(|s| s as Arc<dyn ClaimStorePort>), cache)
    }

    #[tokio::test]
    async fn test_get_by_id_serves_second_read_from_cache() {
        let store = Arc::new(MockClaimStore::new());
        let created = store
            .create_claim(ClaimType::Home, &new_claim())
            .await
            .unwrap();
        let service = service_over(Some(store.clone()));

        let first = service.get_by_id(ClaimType::Home, created.id).await.unwrap();
        let second = service.get_by_id(ClaimType::Home, created.id).await.unwrap();

        assert_eq!(first, second);
        assert!(first.is_some());
        assert_eq!(store.get_calls(), 1);
    }

    #[tokio::test]
    async fn test_get_by_id_caches_confirmed_not_found() {
        let store = Arc::new(MockClaimStore::new());
        let service = service_over(Some(store.clone()));

        assert!(service
            .get_by_id(ClaimType::Auto, ClaimId::new(99))
            .await
            .unwrap()
            .is_none());
        assert!(service
            .get_by_id(ClaimType::Auto, ClaimId::new(99))
            .await
            .unwrap()
            .is_none());

        assert_eq!(store.get_calls(), 1);
    }

    #[tokio::test]
    async fn test_get_by_id_does_not_cache_transient_failure() {
        let store = Arc::new(MockClaimStore::new());
        let created = store
            .create_claim(ClaimType::Auto, &new_claim())
            .await
            .unwrap();
        let service = service_over(Some(store.clone()));

        store.set_failing(true);
        assert!(service
            .get_by_id(ClaimType::Auto, created.id)
            .await
            .unwrap()
            .is_none());

        store.set_failing(false);
        let recovered = service.get_by_id(ClaimType::Auto, created.id).await.unwrap();
        assert!(recovered.is_some());
        assert_eq!(store.get_calls(), 2);
    }

    #[tokio::test]
    async fn test_get_by_id_guards_before_any_remote_call() {
        let store = Arc::new(MockClaimStore::new());
        let service = service_over(Some(store.clone()));

        for bad in [0, -5] {
            let error = service
                .get_by_id(ClaimType::Auto, ClaimId::new(bad))
                .await
                .unwrap_err();
            assert!(matches!(error, ClaimError::InvalidClaimId(id) if id == bad));
        }
        assert_eq!(store.get_calls(), 0);
    }

    #[tokio::test]
    async fn test_update_invalidates_cached_claim() {
        let store = Arc::new(MockClaimStore::new());
        let created = store
            .create_claim(ClaimType::Home, &new_claim())
            .await
            .unwrap();
        let service = service_over(Some(store.clone()));

        let cached = service
            .get_by_id(ClaimType::Home, created.id)
            .await
            .unwrap()
            .unwrap();

        let mut changed = cached.clone();
        changed.description = "Burst pipe, kitchen and hallway".to_string();
        service
            .update(ClaimType::Home, created.id, &changed)
            .await
            .unwrap()
            .unwrap();

        let reread = service
            .get_by_id(ClaimType::Home, created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reread.description, "Burst pipe, kitchen and hallway");
        // First read, then a re-read after the write invalidated the entry.
        assert_eq!(store.get_calls(), 2);
    }

    #[tokio::test]
    async fn test_create_degrades_when_unconfigured_or_failing() {
        let unconfigured = service_over(None);
        assert!(unconfigured.create(ClaimType::Auto, &new_claim()).await.is_none());

        let store = Arc::new(MockClaimStore::new());
        store.set_failing(true);
        let failing = service_over(Some(store));
        assert!(failing.create(ClaimType::Auto, &new_claim()).await.is_none());
    }

    #[tokio::test]
    async fn test_assign_adjuster_writes_and_invalidates_cached_claim() {
        let store = Arc::new(MockClaimStore::new());
        let created = store
            .create_claim(ClaimType::Auto, &new_claim())
            .await
            .unwrap();
        let service = service_over(Some(store.clone()));

        // Prime the cache before the assignment.
        let before = service
            .get_by_id(ClaimType::Auto, created.id)
            .await
            .unwrap()
            .unwrap();
        assert!(before.adjuster_id.is_none());

        let assigned = service
            .assign_adjuster(ClaimType::Auto, created.id, AdjusterId::new(2))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(assigned.adjuster_id, Some(AdjusterId::new(2)));
        assert_eq!(store.assign_calls(), 1);

        let reread = service
            .get_by_id(ClaimType::Auto, created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reread.adjuster_id, Some(AdjusterId::new(2)));
        assert_eq!(store.get_calls(), 2);
    }

    #[tokio::test]
    async fn test_assign_adjuster_write_failure_degrades() {
        let store = Arc::new(MockClaimStore::new());
        let created = store
            .create_claim(ClaimType::Auto, &new_claim())
            .await
            .unwrap();
        store.set_assignment_failing(true);
        let service = service_over(Some(store));

        let result = service
            .assign_adjuster(ClaimType::Auto, created.id, AdjusterId::new(2))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_create_decision_invalidates_owning_claim() {
        let store = Arc::new(MockClaimStore::new());
        let created = store
            .create_claim(ClaimType::Auto, &new_claim())
            .await
            .unwrap();
        let service = service_over(Some(store.clone()));

        // Prime the cache before the decision exists.
        let before = service
            .get_by_id(ClaimType::Auto, created.id)
            .await
            .unwrap()
            .unwrap();
        assert!(before.decision.is_none());

        let decision = ClaimDecision::rejection(created.id, "Policy lapsed", "no coverage");
        service
            .create_decision(&decision, ClaimType::Auto)
            .await
            .unwrap()
            .unwrap();

        let after = service
            .get_by_id(ClaimType::Auto, created.id)
            .await
            .unwrap()
            .unwrap();
        assert!(after.decision.is_some());
    }

    #[tokio::test]
    async fn test_decision_writes_guard_claim_id() {
        let store = Arc::new(MockClaimStore::new());
        let service = service_over(Some(store.clone()));
        let decision = ClaimDecision::approval(ClaimId::new(0), dec!(100), "ok");

        assert!(service
            .create_decision(&decision, ClaimType::Auto)
            .await
            .is_err());
        assert!(service
            .update_decision(&decision, ClaimType::Auto)
            .await
            .is_err());
        assert_eq!(store.decision_create_calls(), 0);
        assert_eq!(store.decision_update_calls(), 0);
    }

    #[tokio::test]
    async fn test_decision_write_failure_degrades_to_none() {
        let store = Arc::new(MockClaimStore::new());
        let created = store
            .create_claim(ClaimType::Auto, &new_claim())
            .await
            .unwrap();
        store.set_decision_writes_failing(true);
        let service = service_over(Some(store));

        let decision = ClaimDecision::approval(created.id, dec!(100), "ok");
        let result = service.create_decision(&decision, ClaimType::Auto).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_unconfigured_store_reads_return_empty() {
        let service = service_over(None);
        let result = service.get_by_id(ClaimType::Auto, ClaimId::new(1)).await.unwrap();
        assert!(result.is_none());
    }
}
