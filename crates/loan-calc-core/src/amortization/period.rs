use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::annuity::monthly_rate;
use crate::{types::*, LoanCalcError, LoanCalcResult};

/// Below this share of principal left after interest the term is effectively infinite.
const AMORTIZATION_EPSILON: Decimal = dec!(0.000000000001);

/// Solve the term (in years) that amortizes `loan_amount` with a level
/// `monthly_payment` at `annual_rate` percent.
///
/// Inverse of the annuity formula: `n = -ln(1 - P*r/M) / ln(1 + r)`, reported
/// as `n / 12`. The result is not rounded. Returns `None` when the payment is
/// zero, when it does not cover the first month's interest (the loan would
/// never be repaid), or when the solve is otherwise undefined.
pub fn loan_period(loan_amount: Money, annual_rate: Percent, monthly_payment: Money) -> Option<Years> {
    if monthly_payment.is_zero() {
        return None;
    }

    let months = if annual_rate.is_zero() {
        loan_amount.checked_div(monthly_payment)?
    } else {
        let r = monthly_rate(annual_rate);
        let one_plus_r = Decimal::ONE + r;
        if one_plus_r <= Decimal::ZERO {
            return None;
        }

        let interest_share = loan_amount.checked_mul(r)?.checked_div(monthly_payment)?;
        let remaining = Decimal::ONE - interest_share;
        if remaining <= AMORTIZATION_EPSILON {
            return None;
        }

        let denominator = one_plus_r.checked_ln()?;
        if denominator.is_zero() {
            return None;
        }
        (-remaining.checked_ln()?).checked_div(denominator)?
    };

    if months < Decimal::ZERO {
        return None;
    }
    months.checked_div(dec!(12))
}

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodInput {
    pub loan_amount: Money,
    /// Annual interest rate in percent (5 = 5%).
    pub interest_rate: Percent,
    pub monthly_payment: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodOutput {
    /// Exact solved term, rounded to 4 dp for display.
    pub term_years: Years,
    /// Number of monthly payments, the last one possibly partial.
    pub term_months: u32,
    /// Completed years (fraction dropped), the figure shown on period sliders.
    pub whole_years: u32,
    /// First month's interest; the payment must exceed this to amortize.
    pub first_month_interest: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Solve the repayment term for a given monthly payment.
pub fn calculate_period(input: &PeriodInput) -> LoanCalcResult<ComputationOutput<PeriodOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let first_month_interest = input
        .loan_amount
        .checked_mul(monthly_rate(input.interest_rate))
        .ok_or_else(|| {
            LoanCalcError::FinancialImpossibility("First month's interest is out of range".into())
        })?;
    if input.monthly_payment <= first_month_interest {
        return Err(LoanCalcError::FinancialImpossibility(format!(
            "Monthly payment {} does not cover the first month's interest {}",
            input.monthly_payment,
            first_month_interest.round_dp(2)
        )));
    }

    let years = loan_period(input.loan_amount, input.interest_rate, input.monthly_payment)
        .ok_or_else(|| LoanCalcError::DivisionByZero {
            context: "loan period solve".into(),
        })?;

    let term_months = years
        .checked_mul(dec!(12))
        .and_then(|months| months.ceil().to_u32())
        .ok_or_else(|| {
            LoanCalcError::FinancialImpossibility(format!("Term of {years} years is out of range"))
        })?;

    if years > dec!(30) {
        warnings.push(format!(
            "Solved term of {} years exceeds the usual 30-year maximum",
            years.round_dp(1)
        ));
    }

    let output = PeriodOutput {
        term_years: years.round_dp(4),
        term_months,
        whole_years: years.trunc().to_u32().unwrap_or(term_months / 12),
        first_month_interest: first_month_interest.round_dp(2),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "compounding": "monthly",
        "solve": "logarithmic inverse of the annuity formula",
    });

    Ok(with_metadata(
        "Annuity term solve",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_input(input: &PeriodInput) -> LoanCalcResult<()> {
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
    if input.monthly_payment <= Decimal::ZERO {
        return Err(LoanCalcError::InvalidInput {
            field: "monthly_payment".into(),
            reason: "Monthly payment must be positive.".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
