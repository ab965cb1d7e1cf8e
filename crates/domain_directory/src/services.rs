//! Directory domain services
//!
//! Remote-facing services over the directory ports. All follow the same
//! degraded-mode policy: a transport failure or an unconfigured port is
//! logged and converted into an empty result, never an error. The only
//! errors these services raise are guard violations on the caller's input,
//! which must fire before any cache or remote access.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use core_kernel::{CacheEntry, CustomerId, EntityCache, PolicyNumber};

use crate::customer::Customer;
use crate::error::DirectoryError;
use crate::policy::Policy;
use crate::ports::{CustomerDirectoryPort, NotificationPort, PolicyDirectoryPort};

/// Cached read-through access to the customer directory
///
/// Lookups are cached by customer id. A confirmed not-found is cached too;
/// a transport failure is not, so the next lookup retries the remote
/// directory.
pub struct CustomerLookupService {
    directory: Option<Arc<dyn CustomerDirectoryPort>>,
    cache: Arc<dyn EntityCache<CustomerId, Customer>>,
}

impl CustomerLookupService {
    /// Creates the service
    ///
    /// Passing `None` for the directory leaves the service in degraded mode:
    /// every lookup logs and returns `None`.
    pub fn new(
        directory: Option<Arc<dyn CustomerDirectoryPort>>,
        cache: Arc<dyn EntityCache<CustomerId, Customer>>,
    ) -> Self {
        Self { directory, cache }
    }

    /// Looks up a customer by id through the cache
    ///
    /// Returns `Ok(None)` when the customer does not exist, the directory is
    /// not configured, or the directory call failed; the three cases are
    /// deliberately indistinguishable to callers. Fails fast with a
    /// validation error on a non-positive id, before any cache or remote
    /// access.
    #[instrument(skip(self), fields(customer_id = %id))]
    pub async fn get_by_id(&self, id: CustomerId) -> Result<Option<Customer>, DirectoryError> {
        if !id.is_valid() {
            return Err(DirectoryError::InvalidCustomerId(id.value()));
        }

        if let Some(entry) = self.cache.get(&id) {
            debug!("Customer served from cache");
            return Ok(entry.into_option());
        }

        let Some(directory) = &self.directory else {
            debug!("Customer directory not configured, returning empty result");
            return Ok(None);
        };

        match directory.get_customer_by_id(id).await {
            Ok(customer) => {
                self.cache.put(id, CacheEntry::Found(customer.clone()));
                Ok(Some(customer))
            }
            Err(error) if error.is_not_found() => {
                self.cache.put(id, CacheEntry::Missing);
                Ok(None)
            }
            Err(error) => {
                warn!(%error, "Customer lookup failed, degrading to empty result");
                Ok(None)
            }
        }
    }
}

/// Uncached access to the policy directory
///
/// Policies are read at most once per task, so lookups go straight to the
/// remote directory.
pub struct PolicyLookupService {
    directory: Option<Arc<dyn PolicyDirectoryPort>>,
}

impl PolicyLookupService {
    /// Creates the service; `None` for the directory leaves every lookup
    /// returning an empty result
    pub fn new(directory: Option<Arc<dyn PolicyDirectoryPort>>) -> Self {
        Self { directory }
    }

    /// Looks up a policy by its policy number
    ///
    /// Returns `Ok(None)` when the policy does not exist, the directory is
    /// not configured, or the directory call failed. Fails fast with a
    /// validation error on a blank policy number.
    #[instrument(skip(self), fields(policy_number = %number))]
    pub async fn get_by_number(
        &self,
        number: &PolicyNumber,
    ) -> Result<Option<Policy>, DirectoryError> {
        if !number.is_valid() {
            return Err(DirectoryError::InvalidPolicyNumber);
        }

        let Some(directory) = &self.directory else {
            debug!("Policy directory not configured, returning empty result");
            return Ok(None);
        };

        match directory.get_policy_by_number(number).await {
            Ok(policy) => Ok(Some(policy)),
            Err(error) if error.is_not_found() => Ok(None),
            Err(error) => {
                warn!(%error, "Policy lookup failed, degrading to empty result");
                Ok(None)
            }
        }
    }
}

/// Outcome of a notification attempt
///
/// Carried into the owning task's output variables so the process can branch
/// on delivery without the task ever failing over it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationOutcome {
    /// Whether the gateway accepted the message
    pub sent: bool,
    /// The message text that was (or would have been) delivered
    pub message: String,
}

/// Sends customer notifications, converting every failure into an outcome
pub struct NotificationService {
    gateway: Option<Arc<dyn NotificationPort>>,
}

impl NotificationService {
    /// Creates the service; `None` leaves it in degraded mode where nothing
    /// is sent and every outcome reports `sent: false`
    pub fn new(gateway: Option<Arc<dyn NotificationPort>>) -> Self {
        Self { gateway }
    }

    /// Attempts to deliver a message to the given address
    ///
    /// Never fails: gateway errors, gateway refusals, and an unconfigured
    /// gateway all come back as `sent: false` with the message preserved.
    #[instrument(skip(self, message), fields(recipient = %email))]
    pub async fn notify_customer(&self, email: &str, message: &str) -> NotificationOutcome {
        let sent = match &self.gateway {
            None => {
                debug!("Notification gateway not configured, skipping send");
                false
            }
            Some(gateway) => match gateway.send_to_customer(email, message).await {
                Ok(true) => true,
                Ok(false) => {
                    warn!("Notification gateway declined the message");
                    false
                }
                Err(error) => {
                    warn!(%error, "Notification send failed");
                    false
                }
            },
        };

        NotificationOutcome {
            sent,
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::mock::{MockCustomerDirectory, MockNotificationGateway, MockPolicyDirectory};
    use core_kernel::InMemoryCache;

    fn test_customer(id: i64) -> Customer {
        Customer {
            id: CustomerId::new(id),
            first_name: "Jane".to_string(),
            last_name: "Porter".to_string(),
            notification_email: "jane@example.com".to_string(),
        }
    }

    fn cache() -> Arc<InMemoryCache<CustomerId, Customer>> {
        Arc::new(InMemoryCache::new())
    }

    #[tokio::test]
    async fn test_lookup_hits_remote_once_then_cache() {
        let directory = Arc::new(MockCustomerDirectory::with_customers(vec![test_customer(1)]).await);
        let service = CustomerLookupService::new(Some(directory.clone()), cache());

        let first = service.get_by_id(CustomerId::new(1)).await.unwrap();
        let second = service.get_by_id(CustomerId::new(1)).await.unwrap();

        assert_eq!(first, second);
        assert!(first.is_some());
        assert_eq!(directory.call_count(), 1);
    }

    #[tokio::test]
    async fn test_confirmed_not_found_is_cached() {
        let directory = Arc::new(MockCustomerDirectory::new());
        let service = CustomerLookupService::new(Some(directory.clone()), cache());

        assert!(service.get_by_id(CustomerId::new(5)).await.unwrap().is_none());
        assert!(service.get_by_id(CustomerId::new(5)).await.unwrap().is_none());

        // The not-found answer was definite, so only the first lookup went out.
        assert_eq!(directory.call_count(), 1);
    }

    #[tokio::test]
    async fn test_transient_failure_not_cached() {
        let directory = Arc::new(MockCustomerDirectory::with_customers(vec![test_customer(3)]).await);
        let service = CustomerLookupService::new(Some(directory.clone()), cache());

        directory.set_failing(true);
        assert!(service.get_by_id(CustomerId::new(3)).await.unwrap().is_none());

        // Once the directory recovers, the next lookup fetches the customer.
        directory.set_failing(false);
        let found = service.get_by_id(CustomerId::new(3)).await.unwrap();
        assert!(found.is_some());
        assert_eq!(directory.call_count(), 2);
    }

    #[tokio::test]
    async fn test_invalid_id_rejected_before_remote_call() {
        let directory = Arc::new(MockCustomerDirectory::new());
        let service = CustomerLookupService::new(Some(directory.clone()), cache());

        for bad_id in [0i64, -1, -42] {
            let result = service.get_by_id(CustomerId::new(bad_id)).await;
            assert!(matches!(result, Err(DirectoryError::InvalidCustomerId(_))));
        }
        assert_eq!(directory.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unconfigured_directory_degrades_to_empty() {
        let service = CustomerLookupService::new(None, cache());
        let result = service.get_by_id(CustomerId::new(1)).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_policy_lookup_finds_and_misses() {
        let policy = Policy {
            policy_number: PolicyNumber::new("P-100"),
            customer_id: CustomerId::new(1),
        };
        let directory = Arc::new(MockPolicyDirectory::with_policies(vec![policy]).await);
        let service = PolicyLookupService::new(Some(directory));

        let found = service
            .get_by_number(&PolicyNumber::new("P-100"))
            .await
            .unwrap();
        assert!(found.is_some());

        let missing = service
            .get_by_number(&PolicyNumber::new("P-404"))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_policy_lookup_blank_number_rejected_before_remote_call() {
        let directory = Arc::new(MockPolicyDirectory::new());
        let service = PolicyLookupService::new(Some(directory.clone()));

        let result = service.get_by_number(&PolicyNumber::new("   ")).await;
        assert!(matches!(result, Err(DirectoryError::InvalidPolicyNumber)));
        assert_eq!(directory.call_count(), 0);
    }

    #[tokio::test]
    async fn test_policy_lookup_transport_failure_degrades() {
        let policy = Policy {
            policy_number: PolicyNumber::new("P-7"),
            customer_id: CustomerId::new(2),
        };
        let directory = Arc::new(MockPolicyDirectory::with_policies(vec![policy]).await);
        directory.set_failing(true);
        let service = PolicyLookupService::new(Some(directory));

        let result = service.get_by_number(&PolicyNumber::new("P-7")).await;
        assert!(result.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_policy_lookup_unconfigured_directory_degrades() {
        let service = PolicyLookupService::new(None);
        let result = service.get_by_number(&PolicyNumber::new("P-1")).await;
        assert!(result.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_notify_customer_success() {
        let gateway = Arc::new(MockNotificationGateway::new());
        let service = NotificationService::new(Some(gateway.clone()));

        let outcome = service.notify_customer("jane@example.com", "hello").await;
        assert!(outcome.sent);
        assert_eq!(outcome.message, "hello");
        assert_eq!(gateway.sent_messages().await.len(), 1);
    }

    #[tokio::test]
    async fn test_notify_customer_gateway_failure_is_not_sent() {
        let gateway = Arc::new(MockNotificationGateway::new());
        gateway.set_failing(true);
        let service = NotificationService::new(Some(gateway));

        let outcome = service.notify_customer("jane@example.com", "hello").await;
        assert!(!outcome.sent);
        assert_eq!(outcome.message, "hello");
    }

    #[tokio::test]
    async fn test_notify_customer_unconfigured_gateway() {
        let service = NotificationService::new(None);
        let outcome = service.notify_customer("jane@example.com", "hello").await;
        assert!(!outcome.sent);
    }
}
