use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Percent, Years};

/// Underwriting thresholds applied by the affordability assessments.
///
/// `Default` carries the mortgage book; [`LendingStandards::credit`] the
/// consumer credit book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LendingStandards {
    /// Back-end DTI ceiling, percent.
    pub max_dti: Percent,
    /// Floor rate the DTI is re-tested at, percent.
    pub stress_test_rate: Percent,
    /// Added to the contract rate before applying the floor, percentage points.
    pub stress_rate_margin: Percent,
    pub max_age_at_maturity: u32,
    pub min_credit_score: u32,
    pub good_credit_score: u32,
    pub excellent_credit_score: u32,
    pub min_employment_years: Years,
    /// DTI above this approves only with a condition attached.
    pub income_verification_dti: Percent,
    /// Scores below this approve only at a higher rate.
    pub rate_premium_credit_score: u32,
    /// LTV above this requires mortgage insurance.
    pub mortgage_insurance_ltv: Percent,
    /// Credit amount as a share of annual income, percent.
    pub max_credit_to_income: Percent,
    /// Credit-to-income above this approves only against collateral.
    pub collateral_credit_to_income: Percent,
}

impl LendingStandards {
    /// Consumer credit book: stress at contract + 2, maturity by 70, bands 620/680/750.
    pub fn credit() -> Self {
        Self {
            max_dti: dec!(42),
            stress_test_rate: Decimal::ZERO,
            stress_rate_margin: dec!(2),
            max_age_at_maturity: 70,
            min_credit_score: 620,
            good_credit_score: 680,
            excellent_credit_score: 750,
            min_employment_years: dec!(2),
            income_verification_dti: dec!(35),
            rate_premium_credit_score: 700,
            mortgage_insurance_ltv: dec!(75),
            max_credit_to_income: dec!(300),
            collateral_credit_to_income: dec!(200),
        }
    }

    /// Rate the stress test re-prices at.
    pub fn stress_rate(&self, contract_rate: Percent) -> Percent {
        contract_rate
            .saturating_add(self.stress_rate_margin)
            .max(self.stress_test_rate)
    }
}

impl Default for LendingStandards {
    fn default() -> Self {
        Self {
            max_dti: dec!(42),
            stress_test_rate: dec!(6.5),
            stress_rate_margin: Decimal::ZERO,
            max_age_at_maturity: 75,
            min_credit_score: 620,
            good_credit_score: 670,
            excellent_credit_score: 740,
            min_employment_years: dec!(2),
            income_verification_dti: dec!(35),
            rate_premium_credit_score: 700,
            mortgage_insurance_ltv: dec!(75),
            max_credit_to_income: dec!(300),
            collateral_credit_to_income: dec!(200),
        }
    }
}
