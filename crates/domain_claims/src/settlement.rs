//! Settlement math
//!
//! Approved amounts derive from the submitted invoice amount. Full
//! settlements pay the invoice as-is; partial settlements pay 80 percent,
//! rounded half-up to cents.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// How much of the invoice a settlement covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementRatio {
    /// Pay the invoice in full
    Full,
    /// Pay 80 percent of the invoice
    Partial,
}

impl SettlementRatio {
    /// The amount approved for the given invoice amount
    ///
    /// Partial settlements round to two decimal places with half-up
    /// midpoint handling, so 1000.00 settles at exactly 800.00 and
    /// 1234.56 at 987.65.
    pub fn approved_amount(&self, invoice_amount: Decimal) -> Decimal {
        match self {
            SettlementRatio::Full => invoice_amount,
            SettlementRatio::Partial => (invoice_amount * dec!(0.80))
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SettlementRatio::Full => "FULL",
            SettlementRatio::Partial => "PARTIAL",
        }
    }
}
