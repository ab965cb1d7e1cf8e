//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain types that give
//! more meaningful error messages than standard assertions.

use domain_claims::{Claim, ClaimStatus};
use rust_decimal::Decimal;

/// Asserts that a claim is in the expected lifecycle status
pub fn assert_claim_status(claim: &Claim, expected: ClaimStatus) {
    assert_eq!(
        claim.status, expected,
        "Claim {} is {}, expected {}",
        claim.id, claim.status, expected
    );
}

/// Asserts that a claim was paid out at the expected amount
pub fn assert_claim_paid(claim: &Claim, expected: Decimal) {
    assert_claim_status(claim, ClaimStatus::Paid);
    assert_eq!(
        claim.paid_amount,
        Some(expected),
        "Claim {} paid amount is {:?}, expected {}",
        claim.id,
        claim.paid_amount,
        expected
    );
}

/// Asserts that an amount is strictly positive
pub fn assert_amount_positive(amount: Decimal) {
    assert!(
        amount > Decimal::ZERO,
        "Expected positive amount, got {}",
        amount
    );
}

/// Asserts that an amount carries no sub-cent precision
pub fn assert_cent_precision(amount: Decimal) {
    assert!(
        amount.scale() <= 2,
        "Amount {} has sub-cent precision (scale={})",
        amount,
        amount.scale()
    );
}

/// Asserts that a decimal value is within a range
pub fn assert_decimal_in_range(value: Decimal, min: Decimal, max: Decimal) {
    assert!(
        value >= min && value <= max,
        "Decimal {} is not in range [{}, {}]",
        value,
        min,
        max
    );
}

/// Asserts that a decimal value is approximately equal to another
pub fn assert_decimal_approx_eq(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "Decimals differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual,
        expected,
        diff,
        tolerance
    );
}

/// Asserts that a result is Ok and returns the value
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $msg:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $msg, e),
        }
    };
}

/// Asserts that a result is Err and returns the error
#[macro_export]
macro_rules! assert_err {
    ($result:expr) => {
        match $result {
            Ok(value) => panic!("Expected Err, got Ok: {:?}", value),
            Err(e) => e,
        }
    };
    ($result:expr, $msg:expr) => {
        match $result {
            Ok(value) => panic!("{}: got Ok({:?})", $msg, value),
            Err(e) => e,
        }
    };
}

/// Asserts that an error matches a specific variant
#[macro_export]
macro_rules! assert_err_variant {
    ($result:expr, $pattern:pat) => {
        match $result {
            Ok(value) => panic!(
                "Expected Err matching {}, got Ok({:?})",
                stringify!($pattern),
                value
            ),
            Err(ref e) => {
                assert!(
                    matches!(e, $pattern),
                    "Error {:?} does not match pattern {}",
                    e,
                    stringify!($pattern)
                );
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::ClaimBuilder;
    use domain_claims::ClaimError;
    use rust_decimal_macros::dec;

    #[test]
    fn test_assert_claim_status_passes() {
        let claim = ClaimBuilder::new().in_review().build();
        assert_claim_status(&claim, ClaimStatus::InReview);
    }

    #[test]
    #[should_panic(expected = "expected APPROVED")]
    fn test_assert_claim_status_reports_both_statuses() {
        let claim = ClaimBuilder::new().build();
        assert_claim_status(&claim, ClaimStatus::Approved);
    }

    #[test]
    fn test_assert_claim_paid() {
        let claim = ClaimBuilder::new()
            .approved()
            .with_status(ClaimStatus::Paid)
            .with_paid_amount(dec!(800.00))
            .build();
        assert_claim_paid(&claim, dec!(800.00));
    }

    #[test]
    fn test_assert_amount_positive() {
        assert_amount_positive(dec!(0.01));
    }

    #[test]
    #[should_panic(expected = "Expected positive amount")]
    fn test_assert_amount_positive_fails_for_zero() {
        assert_amount_positive(Decimal::ZERO);
    }

    #[test]
    fn test_assert_cent_precision() {
        assert_cent_precision(dec!(987.65));
    }

    #[test]
    #[should_panic(expected = "sub-cent precision")]
    fn test_assert_cent_precision_fails_for_mills() {
        assert_cent_precision(dec!(987.648));
    }

    #[test]
    fn test_assert_decimal_approx_eq() {
        assert_decimal_approx_eq(dec!(100.001), dec!(100.002), dec!(0.01));
    }

    #[test]
    fn test_assert_ok_unwraps_the_value() {
        let result: Result<i32, ClaimError> = Ok(5);
        let value = assert_ok!(result);
        assert_eq!(value, 5);
    }

    #[test]
    fn test_assert_err_variant_matches() {
        let result: Result<(), ClaimError> = Err(ClaimError::InvalidClaimType("BOAT".to_string()));
        assert_err_variant!(result, ClaimError::InvalidClaimType(_));
    }

    #[test]
    #[should_panic(expected = "Expected Err")]
    fn test_assert_err_panics_on_ok() {
        let result: Result<i32, ClaimError> = Ok(5);
        assert_err!(result);
    }
}
