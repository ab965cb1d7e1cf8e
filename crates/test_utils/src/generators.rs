//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants, and fake-powered helpers for
//! populating directory mocks with realistic people.

use core_kernel::{AdjusterId, CustomerId, PolicyNumber};
use domain_claims::{ClaimStatus, ClaimType};
use domain_directory::{Adjuster, Customer, EmploymentType, SpecializationArea};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for generating claim types
pub fn claim_type_strategy() -> impl Strategy<Value = ClaimType> {
    prop_oneof![
        Just(ClaimType::Auto),
        Just(ClaimType::Home),
        Just(ClaimType::Health),
    ]
}

/// Strategy for generating claim statuses
pub fn claim_status_strategy() -> impl Strategy<Value = ClaimStatus> {
    prop_oneof![
        Just(ClaimStatus::Submitted),
        Just(ClaimStatus::InReview),
        Just(ClaimStatus::Approved),
        Just(ClaimStatus::Rejected),
        Just(ClaimStatus::Paid),
        Just(ClaimStatus::Closed),
    ]
}

/// Strategy for generating positive cent-precise amounts below one million
pub fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for generating policy numbers in the P-prefixed format
pub fn policy_number_strategy() -> impl Strategy<Value = PolicyNumber> {
    "P-[0-9]{3,6}".prop_map(PolicyNumber::new)
}

/// Strategy for generating claim file numbers
pub fn file_number_strategy() -> impl Strategy<Value = String> {
    "CLM-[0-9]{10}"
}

/// Generates a customer with a fake name and email
pub fn fake_customer(id: i64) -> Customer {
    let first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();
    Customer {
        id: CustomerId::new(id),
        first_name,
        last_name,
        notification_email: SafeEmail().fake(),
    }
}

/// Generates an external adjuster with a fake name
pub fn fake_adjuster(id: i64, specialization: SpecializationArea) -> Adjuster {
    let first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();
    Adjuster {
        id: AdjusterId::new(id),
        first_name,
        last_name,
        specialization,
        employment: EmploymentType::External,
    }
}
