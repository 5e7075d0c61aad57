//! Money rounding helpers.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `rust_decimal::Decimal` everywhere; these helpers pin down the
//! two rounding rules the ledger relies on.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places kept for line and tax amounts.
const MONEY_SCALE: u32 = 2;

/// Rounds an amount to two decimal places, midpoint away from zero.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds an amount to whole currency units, midpoint away from zero.
///
/// Invoice grand totals are rounded this way; the difference is kept as the
/// invoice round-off.
#[must_use]
pub fn round_money_whole(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(10.005), dec!(10.01))]
    #[case(dec!(10.004), dec!(10.00))]
    #[case(dec!(-2.675), dec!(-2.68))]
    fn test_round_money(#[case] input: Decimal, #[case] expected: Decimal) {
        assert_eq!(round_money(input), expected);
    }

    #[rstest]
    #[case(dec!(1179.50), dec!(1180))]
    #[case(dec!(1179.49), dec!(1179))]
    #[case(dec!(1000), dec!(1000))]
    #[case(dec!(-0.5), dec!(-1))]
    fn test_round_money_whole(#[case] input: Decimal, #[case] expected: Decimal) {
        assert_eq!(round_money_whole(input), expected);
    }
}
