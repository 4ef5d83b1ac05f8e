use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::loan_limits::PropertyOwnership;
use crate::{types::*, LoanCalcError, LoanCalcResult};

pub const DEFAULT_MIN_LOAN_AMOUNT: Money = dec!(10_000);
pub const DEFAULT_MAX_LOAN_AMOUNT: Money = dec!(10_000_000);
pub const DEFAULT_MAX_TERM_YEARS: u32 = 30;
pub const DEFAULT_MIN_INTEREST_RATE: Percent = dec!(0);
pub const DEFAULT_MAX_INTEREST_RATE: Percent = dec!(20);

/// A calculator request as submitted by the mortgage forms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationParams {
    pub loan_amount: Money,
    /// Annual interest rate in percent (5 = 5%).
    pub interest_rate: Percent,
    pub term_years: u32,
    pub property_value: Money,
    #[serde(default)]
    pub property_ownership: PropertyOwnership,
}

/// Static limits every request must respect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationBounds {
    pub min_loan_amount: Money,
    pub max_loan_amount: Money,
    pub max_term_years: u32,
    pub min_interest_rate: Percent,
    pub max_interest_rate: Percent,
}

impl Default for ValidationBounds {
    fn default() -> Self {
        Self {
            min_loan_amount: DEFAULT_MIN_LOAN_AMOUNT,
            max_loan_amount: DEFAULT_MAX_LOAN_AMOUNT,
            max_term_years: DEFAULT_MAX_TERM_YEARS,
            min_interest_rate: DEFAULT_MIN_INTEREST_RATE,
            max_interest_rate: DEFAULT_MAX_INTEREST_RATE,
        }
    }
}

impl ValidationBounds {
    /// Bounds must describe a non-empty range for every field.
    pub fn check(&self) -> LoanCalcResult<()> {
        if self.min_loan_amount < Decimal::ZERO || self.min_loan_amount > self.max_loan_amount {
            return Err(LoanCalcError::InvalidInput {
                field: "bounds.loan_amount".into(),
                reason: format!(
                    "Loan amount range {}..{} is empty or negative.",
                    self.min_loan_amount, self.max_loan_amount
                ),
            });
        }
        if self.max_term_years == 0 {
            return Err(LoanCalcError::InvalidInput {
                field: "bounds.max_term_years".into(),
                reason: "Maximum term must be at least one year.".into(),
            });
        }
        if self.min_interest_rate > self.max_interest_rate {
            return Err(LoanCalcError::InvalidInput {
                field: "bounds.interest_rate".into(),
                reason: format!(
                    "Interest rate range {}..{} is empty.",
                    self.min_interest_rate, self.max_interest_rate
                ),
            });
        }
        Ok(())
    }
}
