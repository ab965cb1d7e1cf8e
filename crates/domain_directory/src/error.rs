//! Directory domain errors

use thiserror::Error;

/// Errors that can occur in the directory domain
///
/// The lookup services degrade remote failures to empty results, so the only
/// errors that escape are guard violations on the caller's input.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Customer ID must be positive, got {0}")]
    InvalidCustomerId(i64),

    #[error("Policy number cannot be blank")]
    InvalidPolicyNumber,
}
