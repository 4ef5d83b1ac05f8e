use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::bounds::{CalculationParams, ValidationBounds};
use crate::loan_limits::LtvTable;
use crate::LoanCalcResult;

/// Outcome of checking a request. Every violated rule contributes one message,
/// in rule order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Checks requests against a set of bounds and LTV ceilings.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    bounds: ValidationBounds,
    ltv: LtvTable,
}

impl Validator {
    /// Fails when the bounds are inverted or a ceiling lies outside 0..=100.
    pub fn new(bounds: ValidationBounds, ltv: LtvTable) -> LoanCalcResult<Self> {
        bounds.check()?;
        ltv.validate()?;
        Ok(Self { bounds, ltv })
    }

    pub fn bounds(&self) -> &ValidationBounds {
        &self.bounds
    }

    pub fn ltv_table(&self) -> &LtvTable {
        &self.ltv
    }

    /// Run every rule; never stops at the first failure.
    pub fn validate(&self, params: &CalculationParams) -> ValidationResult {
        let b = &self.bounds;
        let mut errors = Vec::new();

        if params.loan_amount < b.min_loan_amount {
            errors.push(format!("Loan amount must be at least {}", b.min_loan_amount));
        }
        if params.loan_amount > b.max_loan_amount {
            errors.push(format!("Loan amount cannot exceed {}", b.max_loan_amount));
        }
        if params.term_years > b.max_term_years {
            errors.push(format!("Loan term cannot exceed {} years", b.max_term_years));
        }
        if params.term_years == 0 {
            errors.push("Loan term must be at least 1 year".to_string());
        }
        if params.interest_rate < b.min_interest_rate || params.interest_rate > b.max_interest_rate {
            errors.push(format!(
                "Interest rate must be between {}% and {}%",
                b.min_interest_rate, b.max_interest_rate
            ));
        }
        if params.property_value <= Decimal::ZERO {
            errors.push("Property value must be greater than 0".to_string());
        }

        let ceiling = self
            .ltv
            .max_loan_amount(params.property_value, params.property_ownership);
        if params.loan_amount > ceiling {
            errors.push(format!(
                "Loan amount exceeds the maximum of {} allowed for this property ({}% LTV)",
                ceiling,
                self.ltv.ratio(params.property_ownership)
            ));
        }

        ValidationResult::from_errors(errors)
    }
}

/// Validate against the default bounds and LTV table.
pub fn validate(params: &CalculationParams) -> ValidationResult {
    Validator::default().validate(params)
}
