use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::annuity::months_in;
use super::payment::{credit_annuity_payment, remaining_amount};
use crate::{types::*, LoanCalcError, LoanCalcResult};

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditPaymentInput {
    pub amount: Money,
    /// May be fractional, e.g. 2.5 years.
    pub term_years: Years,
    /// Annual interest rate in percent (8.5 = 8.5%).
    pub interest_rate: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditPaymentOutput {
    pub monthly_payment: Money,
    pub number_of_payments: Decimal,
    pub total_payment: Money,
    pub total_interest: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemainingAmountInput {
    pub balance: Money,
    pub years_remaining: Years,
    pub interest_rate: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemainingAmountOutput {
    pub remaining_amount: Money,
    pub accrued_interest: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Consumer credit instalment with totals. Instalments round up.
pub fn calculate_credit_payment(
    input: &CreditPaymentInput,
) -> LoanCalcResult<ComputationOutput<CreditPaymentOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.amount < Decimal::ZERO {
        return Err(LoanCalcError::InvalidInput {
            field: "amount".into(),
            reason: "Credit amount cannot be negative.".into(),
        });
    }
    if input.term_years <= Decimal::ZERO {
        return Err(LoanCalcError::InvalidInput {
            field: "term_years".into(),
            reason: "Term must be positive.".into(),
        });
    }
    if input.interest_rate < Decimal::ZERO {
        return Err(LoanCalcError::InvalidInput {
            field: "interest_rate".into(),
            reason: "Interest rate cannot be negative.".into(),
        });
    }

    let payment = credit_annuity_payment(input.amount, input.term_years, input.interest_rate)
        .ok_or_else(|| {
            LoanCalcError::FinancialImpossibility(format!(
                "Credit payment is undefined for {} over {} years",
                input.amount, input.term_years
            ))
        })?;
    let periods = months_in(input.term_years).ok_or_else(|| LoanCalcError::InvalidInput {
        field: "term_years".into(),
        reason: "Term is out of range.".into(),
    })?;
    if !periods.fract().is_zero() {
        warnings.push(format!(
            "Term of {periods} months is not a whole number of payments; totals are approximate"
        ));
    }

    let total_payment = payment.checked_mul(periods).ok_or_else(|| {
        LoanCalcError::FinancialImpossibility(format!(
            "Total of {periods} payments of {payment} is out of range"
        ))
    })?;
    let total_interest = total_payment.checked_sub(input.amount).ok_or_else(|| {
        LoanCalcError::FinancialImpossibility("Total interest is out of range".into())
    })?;
    let output = CreditPaymentOutput {
        monthly_payment: payment,
        number_of_payments: periods,
        total_payment,
        total_interest,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "compounding": "monthly",
        "rounding": "up to the next currency unit",
    });

    Ok(with_metadata(
        "Consumer credit annuity",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

/// Payoff amount on an existing balance under simple interest.
pub fn calculate_remaining_amount(
    input: &RemainingAmountInput,
) -> LoanCalcResult<ComputationOutput<RemainingAmountOutput>> {
    let start = Instant::now();

    if input.balance < Decimal::ZERO {
        return Err(LoanCalcError::InvalidInput {
            field: "balance".into(),
            reason: "Balance cannot be negative.".into(),
        });
    }
    if input.years_remaining < Decimal::ZERO {
        return Err(LoanCalcError::InvalidInput {
            field: "years_remaining".into(),
            reason: "Remaining years cannot be negative.".into(),
        });
    }

    let remaining = remaining_amount(input.balance, input.years_remaining, input.interest_rate)
        .ok_or_else(|| LoanCalcError::FinancialImpossibility("Remaining amount overflowed".into()))?;

    let output = RemainingAmountOutput {
        remaining_amount: remaining,
        accrued_interest: remaining - input.balance.trunc(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "interest": "simple",
        "rounding": "truncated to whole units",
    });

    Ok(with_metadata(
        "Simple-interest payoff",
        &assumptions,
        Vec::new(),
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_credit_payment_totals() {
        let input = CreditPaymentInput {
            amount: dec!(100_000),
            term_years: dec!(5),
            interest_rate: dec!(8.5),
        };
        let out = calculate_credit_payment(&input).unwrap();
        assert_eq!(out.result.monthly_payment, dec!(2052));
        assert_eq!(out.result.number_of_payments, dec!(60));
        assert_eq!(out.result.total_payment, dec!(123_120));
        assert_eq!(out.result.total_interest, dec!(23_120));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_credit_payment_fractional_term_warns() {
        let input = CreditPaymentInput {
            amount: dec!(50_000),
            term_years: dec!(2.55),
            interest_rate: dec!(8.5),
        };
        let out = calculate_credit_payment(&input).unwrap();
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_credit_payment_rejects_zero_term() {
        let input = CreditPaymentInput {
            amount: dec!(50_000),
            term_years: Decimal::ZERO,
            interest_rate: dec!(8.5),
        };
        match calculate_credit_payment(&input).unwrap_err() {
            LoanCalcError::InvalidInput { field, .. } => assert_eq!(field, "term_years"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_credit_payment_total_overflow_is_an_error() {
        let input = CreditPaymentInput {
            amount: dec!(70_000_000_000_000_000_000_000_000_000),
            term_years: dec!(30),
            interest_rate: dec!(5),
        };
        assert!(calculate_credit_payment(&input).is_err());
    }

    #[test]
    fn test_remaining_amount_envelope() {
        let input = RemainingAmountInput {
            balance: dec!(250_000),
            years_remaining: dec!(6),
            interest_rate: dec!(4.5),
        };
        let out = calculate_remaining_amount(&input).unwrap();
        assert_eq!(out.result.remaining_amount, dec!(317_500));
        assert_eq!(out.result.accrued_interest, dec!(67_500));
    }
}
