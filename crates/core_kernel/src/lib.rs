//! Core Kernel - Foundational types and utilities for the claims worker fleet
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Strongly-typed entity identifiers
//! - The port error taxonomy shared by every remote adapter
//! - Validation result accumulation
//! - The read-through entity cache contract and its in-memory implementation

pub mod cache;
pub mod identifiers;
pub mod ports;
pub mod validation;

pub use cache::{CacheEntry, EntityCache, InMemoryCache};
pub use identifiers::{AdjusterId, ClaimId, CustomerId, PolicyNumber};
pub use ports::{
    AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PortError,
};
pub use validation::ValidationResult;
