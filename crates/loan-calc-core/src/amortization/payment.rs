use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::annuity::{level_payment, monthly_rate, months_in};
use crate::rounding::{round_away_whole, round_whole, truncate_whole};
use crate::{types::*, LoanCalcError, LoanCalcResult};

/// Rates above this are accepted but flagged; the calculators cap sliders here.
const HIGH_RATE_WARNING: Decimal = dec!(20);

// ---------------------------------------------------------------------------
// Raw calculators
// ---------------------------------------------------------------------------

/// Level monthly mortgage payment, rounded to the nearest currency unit.
///
/// A zero rate repays the loan in a straight line. Inputs are not validated:
/// negative amounts produce negative payments. Degenerate requests (zero term,
/// overflow) yield `None`, which callers treat as "no value to display".
pub fn monthly_payment(loan_amount: Money, annual_rate: Percent, term_years: u32) -> Option<Money> {
    let periods = Decimal::from(term_years) * dec!(12);
    level_payment(loan_amount, monthly_rate(annual_rate), periods).map(round_whole)
}

/// Monthly payment on a consumer credit, rounded up to the next currency unit.
///
/// Unlike [`monthly_payment`] the term may be fractional (e.g. 2.5 years).
pub fn credit_annuity_payment(amount: Money, term_years: Years, annual_rate: Percent) -> Option<Money> {
    if amount.is_zero() {
        return Some(Decimal::ZERO);
    }
    let periods = months_in(term_years)?;
    level_payment(amount, monthly_rate(annual_rate), periods).map(round_away_whole)
}

/// Total still owed on a balance under simple interest, truncated to whole units.
///
/// `balance * (1 + rate * years / 100)`, the payoff figure used when comparing
/// an existing loan against a refinance offer.
pub fn remaining_amount(balance: Money, years_remaining: Years, annual_rate: Percent) -> Option<Money> {
    let accrued = annual_rate.checked_mul(years_remaining)? / dec!(100);
    let total = balance.checked_mul(Decimal::ONE.checked_add(accrued)?)?;
    Some(truncate_whole(total))
}

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInput {
    pub loan_amount: Money,
    /// Annual interest rate in percent (5 = 5%).
    pub interest_rate: Percent,
    pub term_years: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOutput {
    pub monthly_payment: Money,
    pub number_of_payments: u32,
    pub total_payment: Money,
    pub total_interest: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Monthly payment plus lifetime totals for a fixed-rate loan.
pub fn calculate_payment(input: &PaymentInput) -> LoanCalcResult<ComputationOutput<PaymentOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    if input.interest_rate > HIGH_RATE_WARNING {
        warnings.push(format!(
            "Interest rate {}% is above the usual {}% ceiling",
            input.interest_rate, HIGH_RATE_WARNING
        ));
    }

    let payment = monthly_payment(input.loan_amount, input.interest_rate, input.term_years)
        .ok_or_else(|| {
            LoanCalcError::FinancialImpossibility(format!(
                "Monthly payment is undefined for {} over {} years at {}%",
                input.loan_amount, input.term_years, input.interest_rate
            ))
        })?;

    let (number_of_payments, total_payment, total_interest) =
        lifetime_totals(payment, input.loan_amount, input.term_years)?;

    if input.interest_rate.is_zero() {
        warnings.push("Zero interest rate: payment is a straight-line repayment".into());
    }

    let output = PaymentOutput {
        monthly_payment: payment,
        number_of_payments,
        total_payment,
        total_interest,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "compounding": "monthly",
        "rounding": "nearest currency unit",
    });

    Ok(with_metadata(
        "Fixed-rate annuity (level monthly payment)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Payment count, total paid and total interest over `term_years`.
pub(crate) fn lifetime_totals(
    payment: Money,
    loan_amount: Money,
    term_years: u32,
) -> LoanCalcResult<(u32, Money, Money)> {
    let number_of_payments = term_years.checked_mul(12).ok_or_else(|| LoanCalcError::InvalidInput {
        field: "term_years".into(),
        reason: format!("A term of {term_years} years has too many monthly payments."),
    })?;
    let total_payment = payment
        .checked_mul(Decimal::from(number_of_payments))
        .ok_or_else(|| {
            LoanCalcError::FinancialImpossibility(format!(
                "Total of {number_of_payments} payments of {payment} is out of range"
            ))
        })?;
    let total_interest = total_payment.checked_sub(loan_amount).ok_or_else(|| {
        LoanCalcError::FinancialImpossibility("Total interest is out of range".into())
    })?;
    Ok((number_of_payments, total_payment, total_interest))
}

fn validate_input(input: &PaymentInput) -> LoanCalcResult<()> {
    if input.loan_amount < Decimal::ZERO {
        return Err(LoanCalcError::InvalidInput {
            field: "loan_amount".into(),
            reason: "Loan amount cannot be negative.".into(),
        });
    }
    if input.interest_rate < Decimal::ZERO {
        return Err(LoanCalcError::InvalidInput {
            field: "interest_rate".into(),
            reason: "Interest rate cannot be negative.".into(),
        });
    }
    if input.term_years == 0 {
        return Err(LoanCalcError::InvalidInput {
            field: "term_years".into(),
            reason: "Term must be at least one year.".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_monthly_payment_standard_mortgage() {
        // 1M over 25 years at 4%: 5278.37 before rounding
        assert_eq!(monthly_payment(dec!(1_000_000), dec!(4), 25), Some(dec!(5278)));
    }

    #[test]
    fn test_monthly_payment_zero_rate() {
        assert_eq!(monthly_payment(dec!(1_000_000), Decimal::ZERO, 25), Some(dec!(3333)));
    }

    #[test]
    fn test_monthly_payment_ownership_scenarios() {
        // 20 years at 5% on 75%, 50% and 70% of a 1M property
        assert_eq!(monthly_payment(dec!(750_000), dec!(5), 20), Some(dec!(4950)));
        assert_eq!(monthly_payment(dec!(500_000), dec!(5), 20), Some(dec!(3300)));
        assert_eq!(monthly_payment(dec!(700_000), dec!(5), 20), Some(dec!(4620)));
    }

    #[test]
    fn test_monthly_payment_zero_term_is_undefined() {
        assert_eq!(monthly_payment(dec!(500_000), dec!(5), 0), None);
        assert_eq!(monthly_payment(dec!(500_000), Decimal::ZERO, 0), None);
    }

    #[test]
    fn test_monthly_payment_negative_amount_propagates() {
        let pos = monthly_payment(dec!(300_000), dec!(5), 15).unwrap();
        let neg = monthly_payment(dec!(-300_000), dec!(5), 15).unwrap();
        assert_eq!(neg, -pos);
    }

    #[test]
    fn test_monthly_payment_higher_rate_costs_more() {
        let low = monthly_payment(dec!(600_000), dec!(3), 25).unwrap();
        let high = monthly_payment(dec!(600_000), dec!(6.5), 25).unwrap();
        assert!(high > low);
    }

    #[test]
    fn test_credit_annuity_payment_rounds_up() {
        // 100k over 5 years at 8.5%: 2051.65 before rounding
        assert_eq!(credit_annuity_payment(dec!(100_000), dec!(5), dec!(8.5)), Some(dec!(2052)));
    }

    #[test]
    fn test_credit_annuity_payment_zero_amount() {
        assert_eq!(credit_annuity_payment(Decimal::ZERO, dec!(5), dec!(8.5)), Some(Decimal::ZERO));
    }

    #[test]
    fn test_credit_annuity_payment_negative_amount_is_symmetric() {
        let pos = credit_annuity_payment(dec!(100_000), dec!(5), dec!(8.5)).unwrap();
        let neg = credit_annuity_payment(dec!(-100_000), dec!(5), dec!(8.5)).unwrap();
        assert_eq!(neg, -pos);
    }

    #[test]
    fn test_credit_annuity_payment_degenerate_term() {
        assert_eq!(credit_annuity_payment(dec!(100_000), Decimal::ZERO, dec!(8.5)), None);
        assert_eq!(credit_annuity_payment(dec!(100_000), dec!(-5), dec!(8.5)), None);
    }

    #[test]
    fn test_credit_annuity_payment_fractional_term() {
        let two = credit_annuity_payment(dec!(100_000), dec!(2), dec!(8.5)).unwrap();
        let half = credit_annuity_payment(dec!(100_000), dec!(2.5), dec!(8.5)).unwrap();
        let three = credit_annuity_payment(dec!(100_000), dec!(3), dec!(8.5)).unwrap();
        assert!(two > half && half > three);
    }

    #[test]
    fn test_remaining_amount_simple_interest() {
        assert_eq!(remaining_amount(dec!(500_000), dec!(10), dec!(5)), Some(dec!(750_000)));
        assert_eq!(remaining_amount(dec!(250_000), dec!(6), dec!(4.5)), Some(dec!(317_500)));
        assert_eq!(remaining_amount(dec!(750_000), dec!(3), dec!(6)), Some(dec!(885_000)));
        assert_eq!(remaining_amount(dec!(200_000), dec!(0.5), dec!(8)), Some(dec!(208_000)));
    }

    #[test]
    fn test_calculate_payment_totals() {
        let input = PaymentInput {
            loan_amount: dec!(1_000_000),
            interest_rate: dec!(4),
            term_years: 25,
        };
        let out = calculate_payment(&input).unwrap();
        assert_eq!(out.result.monthly_payment, dec!(5278));
        assert_eq!(out.result.number_of_payments, 300);
        assert_eq!(out.result.total_payment, dec!(1_583_400));
        assert_eq!(out.result.total_interest, dec!(583_400));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_calculate_payment_zero_rate_warns() {
        let input = PaymentInput {
            loan_amount: dec!(120_000),
            interest_rate: Decimal::ZERO,
            term_years: 10,
        };
        let out = calculate_payment(&input).unwrap();
        assert_eq!(out.result.monthly_payment, dec!(1000));
        assert_eq!(out.result.total_interest, Decimal::ZERO);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_calculate_payment_rejects_zero_term() {
        let input = PaymentInput {
            loan_amount: dec!(120_000),
            interest_rate: dec!(5),
            term_years: 0,
        };
        match calculate_payment(&input).unwrap_err() {
            LoanCalcError::InvalidInput { field, .. } => assert_eq!(field, "term_years"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_calculate_payment_rejects_negative_rate() {
        let input = PaymentInput {
            loan_amount: dec!(120_000),
            interest_rate: dec!(-1),
            term_years: 10,
        };
        assert!(matches!(
            calculate_payment(&input),
            Err(LoanCalcError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_calculate_payment_rejects_term_with_too_many_payments() {
        let input = PaymentInput {
            loan_amount: dec!(1_000_000),
            interest_rate: Decimal::ZERO,
            term_years: 400_000_000,
        };
        match calculate_payment(&input).unwrap_err() {
            LoanCalcError::InvalidInput { field, .. } => assert_eq!(field, "term_years"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_calculate_payment_total_overflow_is_an_error() {
        let input = PaymentInput {
            loan_amount: dec!(70_000_000_000_000_000_000_000_000_000),
            interest_rate: dec!(5),
            term_years: 30,
        };
        assert!(matches!(
            calculate_payment(&input),
            Err(LoanCalcError::FinancialImpossibility(_))
        ));
    }

    #[test]
    fn test_calculate_payment_metadata_populated() {
        let input = PaymentInput {
            loan_amount: dec!(400_000),
            interest_rate: dec!(5),
            term_years: 20,
        };
        let out = calculate_payment(&input).unwrap();
        assert!(!out.methodology.is_empty());
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    }
}
