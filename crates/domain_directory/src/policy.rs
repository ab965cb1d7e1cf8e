//! Policy directory entry

use serde::{Deserialize, Serialize};

use core_kernel::{CustomerId, PolicyNumber};

/// A policy as the policy directory reports it
///
/// The directory addresses policies by their business key only; there is no
/// separate numeric id on this view. Read-only from this system's
/// perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Business key
    pub policy_number: PolicyNumber,
    /// The customer holding the policy
    pub customer_id: CustomerId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_roundtrip() {
        let policy = Policy {
            policy_number: PolicyNumber::new("P-4711"),
            customer_id: CustomerId::new(12),
        };
        let json = serde_json::to_string(&policy).unwrap();
        let back: Policy = serde_json::from_str(&json).unwrap();
        assert_eq!(back, policy);
    }
}
