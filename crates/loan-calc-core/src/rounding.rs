//! Rounding rules shared by the calculators.
//!
//! `Decimal::round` rounds half to even; the calculators round half away from
//! zero so that 0.5 of a currency unit always goes up, the way borrowers expect.

use rust_decimal::{Decimal, RoundingStrategy};

/// Nearest whole unit, ties away from zero.
pub fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Whole unit with any fraction pushed away from zero.
pub fn round_away_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::AwayFromZero)
}

/// Whole unit with the fraction dropped.
pub fn truncate_whole(value: Decimal) -> Decimal {
    value.trunc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_whole_ties_away_from_zero() {
        assert_eq!(round_whole(dec!(2.5)), dec!(3));
        assert_eq!(round_whole(dec!(3.5)), dec!(4));
        assert_eq!(round_whole(dec!(-2.5)), dec!(-3));
        assert_eq!(round_whole(dec!(3333.33)), dec!(3333));
    }

    #[test]
    fn test_round_away_whole() {
        assert_eq!(round_away_whole(dec!(2051.01)), dec!(2052));
        assert_eq!(round_away_whole(dec!(-2051.01)), dec!(-2052));
        assert_eq!(round_away_whole(dec!(100)), dec!(100));
    }

    #[test]
    fn test_truncate_whole() {
        assert_eq!(truncate_whole(dec!(208000.99)), dec!(208000));
        assert_eq!(truncate_whole(dec!(-1.9)), dec!(-1));
    }
}
