//! Port Adapters
//!
//! This module provides adapter implementations for domain ports,
//! connecting domain interfaces to the remote HTTP services.
//!
//! # Architecture
//!
//! Each remote service has a corresponding adapter that:
//! - Implements the domain's port trait
//! - Translates between domain models and wire DTOs
//! - Uses [`crate::client::RestService`] for transport and error mapping
//!
//! # Usage
//!
//! ```rust,ignore
//! use infra_rest::{RestClaimStore, RestClientConfig};
//! use domain_claims::ClaimStorePort;
//!
//! let store = RestClaimStore::new(RestClientConfig::new("http://claims:8080"))?;
//! let claim = store.get_claim_by_id(ClaimType::Auto, ClaimId::new(42)).await?;
//! ```

pub mod claims;
pub mod directory;
pub mod queue;

pub use claims::RestClaimStore;
pub use directory::{
    RestAdjusterDirectory, RestCustomerDirectory, RestNotificationGateway, RestPolicyDirectory,
};
pub use queue::RestTaskQueue;
