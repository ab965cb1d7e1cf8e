//! Directory Domain Ports
//!
//! Port interfaces for the remote directories this system queries and the
//! notification gateway it sends through. Each port is deliberately narrow:
//! one operation per remote endpoint the workers actually call.
//!
//! # Adapters
//!
//! - **REST adapters** (`infra_rest`) call the remote directory services.
//! - **Mock adapters** (the [`mock`] module) keep everything in memory, count
//!   invocations, and can be flipped into a failing state, so tests can
//!   assert both the degrade-to-empty policy and the "no remote call on
//!   invalid input" guarantee.
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_directory::ports::CustomerDirectoryPort;
//! use std::sync::Arc;
//!
//! pub struct CustomerLookupService {
//!     directory: Option<Arc<dyn CustomerDirectoryPort>>,
//!     // ...
//! }
//! ```

use async_trait::async_trait;

use core_kernel::{CustomerId, DomainPort, PolicyNumber, PortError};

use crate::adjuster::{Adjuster, EmploymentType, SpecializationArea};
use crate::customer::Customer;
use crate::policy::Policy;

/// Port for the customer directory
#[async_trait]
pub trait CustomerDirectoryPort: DomainPort {
    /// Retrieves a customer by id
    ///
    /// # Returns
    ///
    /// The customer if found, or `PortError::NotFound`
    async fn get_customer_by_id(&self, id: CustomerId) -> Result<Customer, PortError>;
}

/// Port for the policy directory
#[async_trait]
pub trait PolicyDirectoryPort: DomainPort {
    /// Retrieves a policy by its business key
    ///
    /// # Returns
    ///
    /// The policy if found, or `PortError::NotFound`
    async fn get_policy_by_number(&self, number: &PolicyNumber) -> Result<Policy, PortError>;
}

/// Port for the employee directory's adjuster pool
#[async_trait]
pub trait AdjusterDirectoryPort: DomainPort {
    /// Lists adjusters currently available for the given line of business
    /// and employment relationship
    ///
    /// The directory decides availability and ordering; callers rely on the
    /// returned order being stable for deterministic selection.
    async fn available_adjusters(
        &self,
        specialization: SpecializationArea,
        employment: EmploymentType,
    ) -> Result<Vec<Adjuster>, PortError>;
}

/// Port for the customer notification gateway
#[async_trait]
pub trait NotificationPort: DomainPort {
    /// Delivers a message to the given address
    ///
    /// # Returns
    ///
    /// Whether the gateway accepted the message. `Ok(false)` means the
    /// gateway answered but declined delivery; transport problems surface as
    /// errors and are converted to a "not sent" outcome one layer up.
    async fn send_to_customer(&self, email: &str, message: &str) -> Result<bool, PortError>;
}

/// Mock implementations for testing
///
/// In-memory adapters that record every invocation and can be switched into
/// a failing state to simulate remote outages.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// In-memory mock implementation of CustomerDirectoryPort
    #[derive(Debug, Default)]
    pub struct MockCustomerDirectory {
        customers: Arc<RwLock<HashMap<CustomerId, Customer>>>,
        calls: AtomicU64,
        failing: AtomicBool,
    }

    impl MockCustomerDirectory {
        /// Creates an empty mock directory
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with customers for testing
        pub async fn with_customers(customers: Vec<Customer>) -> Self {
            let directory = Self::new();
            for customer in customers {
                directory
                    .customers
                    .write()
                    .await
                    .insert(customer.id, customer);
            }
            directory
        }

        /// Number of remote calls issued against this mock
        pub fn call_count(&self) -> u64 {
            self.calls.load(Ordering::SeqCst)
        }

        /// Makes every subsequent call fail with a connection error
        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }
    }

    impl DomainPort for MockCustomerDirectory {}

    #[async_trait]
    impl CustomerDirectoryPort for MockCustomerDirectory {
        async fn get_customer_by_id(&self, id: CustomerId) -> Result<Customer, PortError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(PortError::connection("customer directory unreachable"));
            }
            self.customers
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Customer", id))
        }
    }

    /// In-memory mock implementation of PolicyDirectoryPort
    #[derive(Debug, Default)]
    pub struct MockPolicyDirectory {
        policies: Arc<RwLock<HashMap<String, Policy>>>,
        calls: AtomicU64,
        failing: AtomicBool,
    }

    impl MockPolicyDirectory {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with policies for testing
        pub async fn with_policies(policies: Vec<Policy>) -> Self {
            let directory = Self::new();
            for policy in policies {
                directory
                    .policies
                    .write()
                    .await
                    .insert(policy.policy_number.as_str().to_string(), policy);
            }
            directory
        }

        pub fn call_count(&self) -> u64 {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }
    }

    impl DomainPort for MockPolicyDirectory {}

    #[async_trait]
    impl PolicyDirectoryPort for MockPolicyDirectory {
        async fn get_policy_by_number(&self, number: &PolicyNumber) -> Result<Policy, PortError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(PortError::connection("policy directory unreachable"));
            }
            self.policies
                .read()
                .await
                .get(number.as_str())
                .cloned()
                .ok_or_else(|| PortError::not_found("Policy", number))
        }
    }

    /// In-memory mock implementation of AdjusterDirectoryPort
    ///
    /// Filters the seeded pool the way the remote directory would, so tests
    /// can mix specializations and employment types in one setup.
    #[derive(Debug, Default)]
    pub struct MockAdjusterDirectory {
        adjusters: Arc<RwLock<Vec<Adjuster>>>,
        calls: AtomicU64,
        failing: AtomicBool,
    }

    impl MockAdjusterDirectory {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates the pool, preserving order for deterministic selection
        pub async fn with_adjusters(adjusters: Vec<Adjuster>) -> Self {
            let directory = Self::new();
            *directory.adjusters.write().await = adjusters;
            directory
        }

        pub fn call_count(&self) -> u64 {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }
    }

    impl DomainPort for MockAdjusterDirectory {}

    #[async_trait]
    impl AdjusterDirectoryPort for MockAdjusterDirectory {
        async fn available_adjusters(
            &self,
            specialization: SpecializationArea,
            employment: EmploymentType,
        ) -> Result<Vec<Adjuster>, PortError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(PortError::connection("employee directory unreachable"));
            }
            Ok(self
                .adjusters
                .read()
                .await
                .iter()
                .filter(|a| a.specialization == specialization && a.employment == employment)
                .cloned()
                .collect())
        }
    }

    /// A notification recorded by the mock gateway
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct SentNotification {
        pub email: String,
        pub message: String,
    }

    /// In-memory mock implementation of NotificationPort
    #[derive(Debug, Default)]
    pub struct MockNotificationGateway {
        sent: Arc<RwLock<Vec<SentNotification>>>,
        failing: AtomicBool,
        rejecting: AtomicBool,
    }

    impl MockNotificationGateway {
        pub fn new() -> Self {
            Self::default()
        }

        /// Messages the gateway accepted, in send order
        pub async fn sent_messages(&self) -> Vec<SentNotification> {
            self.sent.read().await.clone()
        }

        /// Makes every subsequent send fail with a connection error
        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        /// Makes the gateway answer but decline delivery
        pub fn set_rejecting(&self, rejecting: bool) {
            self.rejecting.store(rejecting, Ordering::SeqCst);
        }
    }

    impl DomainPort for MockNotificationGateway {}

    #[async_trait]
    impl NotificationPort for MockNotificationGateway {
        async fn send_to_customer(&self, email: &str, message: &str) -> Result<bool, PortError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(PortError::connection("notification gateway unreachable"));
            }
            if self.rejecting.load(Ordering::SeqCst) {
                return Ok(false);
            }
            self.sent.write().await.push(SentNotification {
                email: email.to_string(),
                message: message.to_string(),
            });
            Ok(true)
        }
    }
}
