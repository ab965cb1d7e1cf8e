//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for the entities the worker tests keep
//! reaching for: one customer with an auto policy, a small adjuster pool,
//! and the dates and amounts of a typical auto claim. Deterministic on
//! purpose; randomized variety lives in [`crate::generators`].

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use core_kernel::{AdjusterId, CustomerId, PolicyNumber};
use domain_directory::{Adjuster, Customer, EmploymentType, Policy, SpecializationArea};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Fixture for directory entries
///
/// The standing cast: Jane Miller holds policy P-100, Dana Reyes is the
/// external AUTO adjuster who picks up her claims.
pub struct DirectoryFixtures;

impl DirectoryFixtures {
    /// The customer every happy-path test files claims for
    pub fn jane_miller() -> Customer {
        Customer {
            id: CustomerId::new(30),
            first_name: "Jane".to_string(),
            last_name: "Miller".to_string(),
            notification_email: "jane.miller@example.com".to_string(),
        }
    }

    /// Jane Miller's auto policy
    pub fn policy_p100() -> Policy {
        Policy {
            policy_number: PolicyNumber::new("P-100"),
            customer_id: CustomerId::new(30),
        }
    }

    /// An external AUTO adjuster, eligible for auto claim assignment
    pub fn dana_reyes() -> Adjuster {
        Adjuster {
            id: AdjusterId::new(7),
            first_name: "Dana".to_string(),
            last_name: "Reyes".to_string(),
            specialization: SpecializationArea::Auto,
            employment: EmploymentType::External,
        }
    }

    /// An internal AUTO adjuster that assignment must skip
    pub fn internal_auto_adjuster() -> Adjuster {
        Adjuster {
            id: AdjusterId::new(8),
            first_name: "Noah".to_string(),
            last_name: "Berg".to_string(),
            specialization: SpecializationArea::Auto,
            employment: EmploymentType::Internal,
        }
    }

    /// An external HOME adjuster for cross-specialization tests
    pub fn home_adjuster() -> Adjuster {
        Adjuster {
            id: AdjusterId::new(9),
            first_name: "Priya".to_string(),
            last_name: "Nair".to_string(),
            specialization: SpecializationArea::Home,
            employment: EmploymentType::External,
        }
    }
}

/// Fixture for claim dates
pub struct DateFixtures;

impl DateFixtures {
    /// Standard incident date (Feb 11, 2025)
    pub fn incident_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 11).unwrap()
    }

    /// Standard reporting timestamp, a few days after the incident
    pub fn reported_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 14, 9, 30, 0).unwrap()
    }
}

/// Fixture for claim amounts
pub struct AmountFixtures;

impl AmountFixtures {
    /// The claimant's damage estimate on a freshly filed claim
    pub fn estimate() -> Decimal {
        dec!(2500.00)
    }

    /// The repair shop invoice submitted for settlement
    pub fn invoice() -> Decimal {
        dec!(1000.00)
    }

    /// The 80 percent settlement of [`AmountFixtures::invoice`]
    pub fn partial_settlement() -> Decimal {
        dec!(800.00)
    }
}
