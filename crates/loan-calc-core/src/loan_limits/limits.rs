use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::ownership::{LtvTable, PropertyOwnership};
use crate::{types::*, LoanCalcError, LoanCalcResult};

// ---------------------------------------------------------------------------
// Raw calculators (default table)
// ---------------------------------------------------------------------------

/// LTV ceiling for `ownership` from the default table.
pub fn ltv_ratio(ownership: PropertyOwnership) -> Percent {
    LtvTable::default().ratio(ownership)
}

/// Largest loan allowed against `property_value`, floored to whole units.
pub fn max_loan_amount(property_value: Money, ownership: PropertyOwnership) -> Money {
    LtvTable::default().max_loan_amount(property_value, ownership)
}

/// Smallest down payment required on `property_value`, rounded up to whole units.
pub fn min_down_payment(property_value: Money, ownership: PropertyOwnership) -> Money {
    LtvTable::default().min_down_payment(property_value, ownership)
}

impl LtvTable {
    /// `floor(property_value * ltv / 100)`, saturating at the decimal range.
    pub fn max_loan_amount(&self, property_value: Money, ownership: PropertyOwnership) -> Money {
        property_value
            .saturating_mul(self.ratio(ownership) / dec!(100))
            .floor()
    }

    /// `ceil(property_value * (100 - ltv) / 100)`.
    pub fn min_down_payment(&self, property_value: Money, ownership: PropertyOwnership) -> Money {
        let equity_share = (dec!(100) - self.ratio(ownership)) / dec!(100);
        property_value.saturating_mul(equity_share).ceil()
    }
}

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanLimitInput {
    pub property_value: Money,
    #[serde(default)]
    pub property_ownership: PropertyOwnership,
    /// Down payment the borrower intends to make, checked against the minimum.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub down_payment: Option<Money>,
    /// Overrides the default LTV ceilings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ltv_table: Option<LtvTable>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanLimitOutput {
    pub property_ownership: PropertyOwnership,
    pub ltv_ratio: Percent,
    pub max_loan_amount: Money,
    pub min_down_payment: Money,
    /// Property value less the proposed down payment.
    pub requested_loan_amount: Option<Money>,
    pub down_payment_sufficient: Option<bool>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Maximum financing and minimum equity for a property purchase.
pub fn derive_loan_limits(input: &LoanLimitInput) -> LoanCalcResult<ComputationOutput<LoanLimitOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let table = input.ltv_table.unwrap_or_default();
    validate_input(input, &table)?;

    let ownership = input.property_ownership;
    let max_loan = table.max_loan_amount(input.property_value, ownership);
    let min_down = table.min_down_payment(input.property_value, ownership);

    let requested = input.down_payment.map(|dp| input.property_value - dp);
    let sufficient = input.down_payment.map(|dp| dp >= min_down);

    if let Some(false) = sufficient {
        warnings.push(format!(
            "Down payment is below the required minimum of {min_down} for {ownership}"
        ));
    }
    if let Some(dp) = input.down_payment {
        if dp > input.property_value {
            warnings.push("Down payment exceeds the property value; no loan is needed".into());
        }
    }

    let output = LoanLimitOutput {
        property_ownership: ownership,
        ltv_ratio: table.ratio(ownership),
        max_loan_amount: max_loan,
        min_down_payment: min_down,
        requested_loan_amount: requested,
        down_payment_sufficient: sufficient,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "ltv_table": table,
        "max_loan_rounding": "floor",
        "min_down_payment_rounding": "ceil",
    });

    Ok(with_metadata(
        "Loan-to-value ceiling by property ownership",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_input(input: &LoanLimitInput, table: &LtvTable) -> LoanCalcResult<()> {
    if input.property_value <= Decimal::ZERO {
        return Err(LoanCalcError::InvalidInput {
            field: "property_value".into(),
            reason: "Property value must be positive.".into(),
        });
    }
    if let Some(dp) = input.down_payment {
        if dp < Decimal::ZERO {
            return Err(LoanCalcError::InvalidInput {
                field: "down_payment".into(),
                reason: "Down payment cannot be negative.".into(),
            });
        }
    }
    table.validate()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
