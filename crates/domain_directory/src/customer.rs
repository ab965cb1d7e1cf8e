//! Customer directory entry

use serde::{Deserialize, Serialize};

use core_kernel::CustomerId;

/// A customer as the customer directory reports it
///
/// Read-only from this system's perspective; the directory is the system of
/// record. Cached by id in [`crate::services::CustomerLookupService`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Unique identifier
    pub id: CustomerId,
    /// Legal first name
    pub first_name: String,
    /// Legal last name
    pub last_name: String,
    /// Address rejection and payment notices are delivered to
    pub notification_email: String,
}

impl Customer {
    /// Returns the full name in "First Last" format
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
