use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::rounding::round_whole;
use crate::{types::*, LoanCalcError, LoanCalcResult};

// ---------------------------------------------------------------------------
// Raw calculators
// ---------------------------------------------------------------------------

/// Debt-to-income ratio in whole percent:
/// `round((payment + existing_debts) / income * 100)`.
///
/// A zero or negative income has no meaningful ratio and yields `None`.
pub fn dti_ratio(
    proposed_monthly_payment: Money,
    monthly_income: Money,
    existing_monthly_debts: Money,
) -> Option<Percent> {
    unrounded_dti(proposed_monthly_payment, monthly_income, existing_monthly_debts).map(round_whole)
}

/// Actual loan-to-value in percent, unrounded. `None` for a non-positive property value.
pub fn loan_to_value(loan_amount: Money, property_value: Money) -> Option<Percent> {
    if property_value <= Decimal::ZERO {
        return None;
    }
    loan_amount.checked_div(property_value)?.checked_mul(dec!(100))
}

pub(crate) fn unrounded_dti(payment: Money, income: Money, existing: Money) -> Option<Percent> {
    if income <= Decimal::ZERO {
        return None;
    }
    payment
        .checked_add(existing)?
        .checked_div(income)?
        .checked_mul(dec!(100))
}

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DtiInput {
    pub proposed_monthly_payment: Money,
    pub monthly_income: Money,
    #[serde(default)]
    pub existing_monthly_debts: Money,
    /// Lender's ceiling in percent; enables the limit check and headroom.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_dti: Option<Percent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DtiOutput {
    pub dti_ratio: Percent,
    pub total_monthly_obligations: Money,
    pub within_limit: Option<bool>,
    /// Largest new payment that keeps the ratio at or under `max_dti`.
    pub max_affordable_payment: Option<Money>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Debt-to-income analysis with an optional ceiling check.
pub fn calculate_dti(input: &DtiInput) -> LoanCalcResult<ComputationOutput<DtiOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let ratio = dti_ratio(
        input.proposed_monthly_payment,
        input.monthly_income,
        input.existing_monthly_debts,
    )
    .ok_or_else(|| LoanCalcError::DivisionByZero {
        context: "DTI ratio (monthly income)".into(),
    })?;

    // dti_ratio already summed these without overflow
    let total = input.proposed_monthly_payment + input.existing_monthly_debts;

    let within_limit = input.max_dti.map(|max| ratio <= max);
    let max_affordable = input
        .max_dti
        .map(|max| {
            input
                .monthly_income
                .checked_mul(max / dec!(100))
                .and_then(|cap| cap.checked_sub(input.existing_monthly_debts))
                .map(|room| room.max(Decimal::ZERO).floor())
                .ok_or_else(|| {
                    LoanCalcError::FinancialImpossibility(format!(
                        "Affordable payment at {max}% DTI is out of range"
                    ))
                })
        })
        .transpose()?;

    if let (Some(false), Some(max)) = (within_limit, input.max_dti) {
        warnings.push(format!("DTI ratio {ratio}% exceeds maximum {max}%"));
    }

    let output = DtiOutput {
        dti_ratio: ratio,
        total_monthly_obligations: total,
        within_limit,
        max_affordable_payment: max_affordable,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "existing_monthly_debts": input.existing_monthly_debts.to_string(),
        "rounding": "nearest whole percent",
    });

    Ok(with_metadata(
        "Debt-to-income ratio",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_input(input: &DtiInput) -> LoanCalcResult<()> {
    if input.monthly_income <= Decimal::ZERO {
        return Err(LoanCalcError::InvalidInput {
            field: "monthly_income".into(),
            reason: "Monthly income must be positive.".into(),
        });
    }
    if input.proposed_monthly_payment < Decimal::ZERO {
        return Err(LoanCalcError::InvalidInput {
            field: "proposed_monthly_payment".into(),
            reason: "Payment cannot be negative.".into(),
        });
    }
    if input.existing_monthly_debts < Decimal::ZERO {
        return Err(LoanCalcError::InvalidInput {
            field: "existing_monthly_debts".into(),
            reason: "Existing debts cannot be negative.".into(),
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
    fn test_dti_ratio_basic() {
        assert_eq!(dti_ratio(dec!(4000), dec!(20_000), dec!(1000)), Some(dec!(25)));
    }

    #[test]
    fn test_dti_ratio_no_existing_debts() {
        // 3000 / 9000 = 33.33% -> 33
        assert_eq!(dti_ratio(dec!(3000), dec!(9000), Decimal::ZERO), Some(dec!(33)));
    }

    #[test]
    fn test_dti_ratio_rounds_half_up() {
        // 1250 / 10000 = 12.5% -> 13
        assert_eq!(dti_ratio(dec!(1250), dec!(10_000), Decimal::ZERO), Some(dec!(13)));
    }

    #[test]
    fn test_dti_ratio_non_positive_income() {
        assert_eq!(dti_ratio(dec!(4000), Decimal::ZERO, dec!(1000)), None);
        assert_eq!(dti_ratio(dec!(4000), dec!(-5000), Decimal::ZERO), None);
    }

    #[test]
    fn test_loan_to_value() {
        assert_eq!(loan_to_value(dec!(600_000), dec!(800_000)), Some(dec!(75)));
        assert_eq!(loan_to_value(dec!(600_000), Decimal::ZERO), None);
    }

    #[test]
    fn test_calculate_dti_with_limit() {
        let input = DtiInput {
            proposed_monthly_payment: dec!(6000),
            monthly_income: dec!(15_000),
            existing_monthly_debts: dec!(1500),
            max_dti: Some(dec!(42)),
        };
        let out = calculate_dti(&input).unwrap();
        assert_eq!(out.result.dti_ratio, dec!(50));
        assert_eq!(out.result.total_monthly_obligations, dec!(7500));
        assert_eq!(out.result.within_limit, Some(false));
        // 15000 * 42% - 1500 = 4800
        assert_eq!(out.result.max_affordable_payment, Some(dec!(4800)));
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_calculate_dti_without_limit() {
        let input = DtiInput {
            proposed_monthly_payment: dec!(4000),
            monthly_income: dec!(20_000),
            existing_monthly_debts: dec!(1000),
            max_dti: None,
        };
        let out = calculate_dti(&input).unwrap();
        assert_eq!(out.result.dti_ratio, dec!(25));
        assert_eq!(out.result.within_limit, None);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_calculate_dti_headroom_overflow_is_an_error() {
        let input = DtiInput {
            proposed_monthly_payment: dec!(1000),
            monthly_income: Decimal::MAX,
            existing_monthly_debts: Decimal::ZERO,
            max_dti: Some(dec!(250)),
        };
        assert!(matches!(
            calculate_dti(&input),
            Err(LoanCalcError::FinancialImpossibility(_))
        ));
    }

    #[test]
    fn test_calculate_dti_rejects_zero_income() {
        let input = DtiInput {
            proposed_monthly_payment: dec!(4000),
            monthly_income: Decimal::ZERO,
            existing_monthly_debts: Decimal::ZERO,
            max_dti: None,
        };
        match calculate_dti(&input).unwrap_err() {
            LoanCalcError::InvalidInput { field, .. } => assert_eq!(field, "monthly_income"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }
}
