//! Infrastructure REST Layer
//!
//! This crate provides the HTTP infrastructure for the claims worker fleet,
//! implementing the domain ports against the remote claim store, the
//! customer, policy, and employee directories, the notification gateway,
//! and the external task queue.
//!
//! # Architecture
//!
//! Every adapter wraps one remote service behind a shared [`client::RestService`]
//! that owns URL joining, JSON transport, and the mapping from HTTP status
//! codes and transport failures to [`core_kernel::PortError`]. Domain code
//! never sees an HTTP type.
//!
//! # Error mapping
//!
//! - 404 becomes `PortError::NotFound`
//! - 400 and 422 become `PortError::Validation`
//! - 401 and 403 become `PortError::Unauthorized`
//! - 408 becomes `PortError::Timeout`, as does a client-side timeout
//! - 429 becomes `PortError::RateLimited` with the `Retry-After` value
//! - 5xx becomes `PortError::ServiceUnavailable`
//! - connection failures become `PortError::Connection`

pub mod adapters;
pub mod client;

pub use adapters::{
    RestAdjusterDirectory, RestClaimStore, RestCustomerDirectory, RestNotificationGateway,
    RestPolicyDirectory, RestTaskQueue,
};
pub use client::RestClientConfig;
