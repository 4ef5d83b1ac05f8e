use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::assessment::LendingStandards;
use crate::loan_limits::LtvTable;
use crate::validation::{ValidationBounds, Validator};
use crate::{types::*, LoanCalcError, LoanCalcResult};

/// Rate used for mortgages when no provider can supply one.
pub const FALLBACK_MORTGAGE_RATE: Percent = dec!(5.0);
/// Rate used for consumer credit when no provider can supply one.
pub const FALLBACK_CREDIT_RATE: Percent = dec!(8.5);

/// Everything a calculator needs besides the borrower's own request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationParameters {
    pub business_path: BusinessPath,
    /// Annual rate in percent offered today on this path.
    pub current_interest_rate: Percent,
    #[serde(default)]
    pub ltv: LtvTable,
    #[serde(default)]
    pub bounds: ValidationBounds,
    #[serde(default)]
    pub standards: LendingStandards,
    /// Set when the values are compiled-in defaults rather than live data.
    #[serde(default)]
    pub is_fallback: bool,
}

impl CalculationParameters {
    /// Compiled-in defaults for `path`.
    pub fn fallback(path: BusinessPath) -> Self {
        let (rate, standards) = match path {
            BusinessPath::Mortgage => (FALLBACK_MORTGAGE_RATE, LendingStandards::default()),
            BusinessPath::Credit => (FALLBACK_CREDIT_RATE, LendingStandards::credit()),
        };
        Self {
            business_path: path,
            current_interest_rate: rate,
            ltv: LtvTable::default(),
            bounds: ValidationBounds::default(),
            standards,
            is_fallback: true,
        }
    }

    /// Reject parameter sets no calculator could use.
    pub fn validate(&self) -> LoanCalcResult<()> {
        self.ltv.validate()?;
        self.bounds.check()?;
        if self.current_interest_rate < Decimal::ZERO || self.current_interest_rate > dec!(100) {
            return Err(LoanCalcError::Configuration(format!(
                "current_interest_rate {}% is outside 0..100",
                self.current_interest_rate
            )));
        }
        if self.standards.max_dti <= Decimal::ZERO || self.standards.max_dti > dec!(100) {
            return Err(LoanCalcError::Configuration(format!(
                "standards.max_dti {}% is outside (0, 100]",
                self.standards.max_dti
            )));
        }
        Ok(())
    }

    /// A validator configured with these bounds and ceilings.
    pub fn validator(&self) -> LoanCalcResult<Validator> {
        Validator::new(self.bounds, self.ltv)
    }
}
