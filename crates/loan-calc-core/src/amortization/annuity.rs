use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::types::{Money, Percent};

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Convert an annual percentage rate (5 = 5%) to the monthly decimal rate.
pub fn monthly_rate(annual_rate: Percent) -> Decimal {
    annual_rate / dec!(100) / MONTHS_PER_YEAR
}

/// Number of monthly periods in `term_years`.
pub fn months_in(term_years: Decimal) -> Option<Decimal> {
    term_years.checked_mul(MONTHS_PER_YEAR)
}

/// Unrounded level payment for `principal` at `periodic_rate` over `periods`.
///
/// Fractional period counts are supported. Returns `None` for non-positive
/// period counts, a zero annuity denominator, or arithmetic overflow.
pub fn level_payment(principal: Money, periodic_rate: Decimal, periods: Decimal) -> Option<Money> {
    if periods <= Decimal::ZERO {
        return None;
    }

    if periodic_rate.is_zero() {
        return principal.checked_div(periods);
    }

    let one_plus_r = Decimal::ONE + periodic_rate;
    if one_plus_r <= Decimal::ZERO {
        return None;
    }

    let factor = if periods.fract().is_zero() {
        one_plus_r.checked_powu(periods.to_u64()?)?
    } else {
        one_plus_r.checked_powd(periods)?
    };

    let denominator = factor.checked_sub(Decimal::ONE)?;
    if denominator.is_zero() {
        return None;
    }

    principal
        .checked_mul(periodic_rate)?
        .checked_mul(factor)?
        .checked_div(denominator)
}
