use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::standards::LendingStandards;
use crate::amortization::monthly_payment;
use crate::amortization::payment::lifetime_totals;
use crate::loan_limits::{LtvTable, PropertyOwnership};
use crate::ratios::dti::unrounded_dti;
use crate::ratios::loan_to_value;
use crate::{types::*, LoanCalcError, LoanCalcResult};

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityInput {
    pub loan_amount: Money,
    /// Annual interest rate in percent (5 = 5%).
    pub interest_rate: Percent,
    pub term_years: u32,
    pub property_value: Money,
    #[serde(default)]
    pub property_ownership: PropertyOwnership,
    pub monthly_income: Money,
    /// Existing monthly obligations (other loans, alimony, card minimums).
    #[serde(default)]
    pub monthly_expenses: Money,
    pub borrower_age: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_score: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employment_years: Option<Years>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditRiskLevel {
    Excellent,
    Good,
    Fair,
    Poor,
}

/// Pass/fail per underwriting criterion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityChecks {
    pub ltv: bool,
    pub dti: bool,
    pub stress_test: bool,
    pub age_at_maturity: bool,
    pub credit_score: bool,
    pub employment: bool,
}

impl AffordabilityChecks {
    fn all(&self) -> bool {
        self.ltv && self.dti && self.stress_test && self.age_at_maturity && self.credit_score && self.employment
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityOutput {
    pub monthly_payment: Money,
    pub total_payment: Money,
    pub total_interest: Money,
    pub ltv_ratio: Percent,
    pub max_ltv_ratio: Percent,
    pub max_loan_amount: Money,
    pub dti_ratio: Percent,
    pub stress_rate: Percent,
    pub stress_monthly_payment: Money,
    pub stress_dti_ratio: Percent,
    pub age_at_maturity: u32,
    pub credit_risk_level: Option<CreditRiskLevel>,
    pub checks: AffordabilityChecks,
    pub approved: bool,
    pub rejection_reasons: Vec<String>,
    pub approval_conditions: Vec<String>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Decide whether a mortgage request is affordable under `standards`.
///
/// The stress test re-prices the loan at [`LendingStandards::stress_rate`].
/// Missing credit score or employment history are not held against the
/// borrower.
pub fn assess_affordability(
    input: &AffordabilityInput,
    standards: &LendingStandards,
    ltv_table: &LtvTable,
) -> LoanCalcResult<ComputationOutput<AffordabilityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;
    ltv_table.validate()?;

    let payment = monthly_payment(input.loan_amount, input.interest_rate, input.term_years)
        .ok_or_else(|| {
            LoanCalcError::FinancialImpossibility("Monthly payment is undefined for this request".into())
        })?;
    let (_, total_payment, total_interest) =
        lifetime_totals(payment, input.loan_amount, input.term_years)?;

    // -- LTV ------------------------------------------------------------------
    let ltv = loan_to_value(input.loan_amount, input.property_value)
        .ok_or_else(|| LoanCalcError::DivisionByZero {
            context: "LTV ratio (property value)".into(),
        })?
        .round_dp(2)
        .normalize();
    let max_ltv = ltv_table.ratio(input.property_ownership);
    let max_loan = ltv_table.max_loan_amount(input.property_value, input.property_ownership);
    let ltv_ok = input.loan_amount <= max_loan;

    // -- DTI ------------------------------------------------------------------
    let dti = income_ratio(payment, input)?;
    let dti_ok = dti <= standards.max_dti;

    // -- Stress test ----------------------------------------------------------
    let stress_rate = standards.stress_rate(input.interest_rate);
    let stress_payment = monthly_payment(input.loan_amount, stress_rate, input.term_years)
        .ok_or_else(|| {
            LoanCalcError::FinancialImpossibility("Stress payment is undefined for this request".into())
        })?;
    let stress_dti = income_ratio(stress_payment, input)?;
    let stress_ok = stress_dti <= standards.max_dti;

    // -- Age ------------------------------------------------------------------
    let age_at_maturity = maturity_age(input.borrower_age, input.term_years)?;
    let age_ok = age_at_maturity <= standards.max_age_at_maturity;

    // -- Credit score ---------------------------------------------------------
    let risk_level = input.credit_score.map(|s| credit_risk_level(s, standards));
    let credit_ok = risk_level != Some(CreditRiskLevel::Poor);
    if input.credit_score.is_none() {
        warnings.push("No credit score supplied; credit check skipped".into());
    }

    // -- Employment -----------------------------------------------------------
    let employment_ok = input
        .employment_years
        .map_or(true, |y| y >= standards.min_employment_years);
    if input.employment_years.is_none() {
        warnings.push("No employment history supplied; employment check skipped".into());
    }

    let checks = AffordabilityChecks {
        ltv: ltv_ok,
        dti: dti_ok,
        stress_test: stress_ok,
        age_at_maturity: age_ok,
        credit_score: credit_ok,
        employment: employment_ok,
    };

    let mut rejection_reasons = Vec::new();
    if !ltv_ok {
        rejection_reasons.push(format!("LTV ratio {ltv}% exceeds maximum {max_ltv}%"));
    }
    if !dti_ok {
        rejection_reasons.push(format!(
            "DTI ratio {}% exceeds maximum {}%",
            dti.round_dp(1).normalize(),
            standards.max_dti
        ));
    }
    if !age_ok {
        rejection_reasons.push(format!(
            "Age at maturity {age_at_maturity} exceeds maximum {}",
            standards.max_age_at_maturity
        ));
    }
    if !stress_ok {
        rejection_reasons.push(format!(
            "Stress test DTI {}% exceeds maximum {}%",
            stress_dti.round_dp(1).normalize(),
            standards.max_dti
        ));
    }
    if let (false, Some(score)) = (credit_ok, input.credit_score) {
        rejection_reasons.push(format!("Credit score {score} below minimum requirement"));
    }
    if let (false, Some(years)) = (employment_ok, input.employment_years) {
        rejection_reasons.push(format!(
            "Employment history {years} years below minimum {} years",
            standards.min_employment_years
        ));
    }

    let mut approval_conditions = Vec::new();
    if ltv > standards.mortgage_insurance_ltv {
        approval_conditions.push("Mortgage insurance required".to_string());
    }
    if let Some(score) = input.credit_score {
        if score < standards.rate_premium_credit_score {
            approval_conditions.push("Higher interest rate due to credit score".to_string());
        }
    }
    if dti > standards.income_verification_dti {
        approval_conditions.push("Additional income verification required".to_string());
    }

    let output = AffordabilityOutput {
        monthly_payment: payment,
        total_payment,
        total_interest,
        ltv_ratio: ltv,
        max_ltv_ratio: max_ltv,
        max_loan_amount: max_loan,
        dti_ratio: dti.round_dp(2),
        stress_rate,
        stress_monthly_payment: stress_payment,
        stress_dti_ratio: stress_dti.round_dp(2),
        age_at_maturity,
        credit_risk_level: risk_level,
        approved: checks.all(),
        checks,
        rejection_reasons,
        approval_conditions,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "standards": standards,
        "ltv_table": ltv_table,
        "monthly_expenses": input.monthly_expenses.to_string(),
    });

    Ok(with_metadata(
        "Mortgage affordability (LTV, DTI, stress test, age, credit, employment)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn income_ratio(payment: Money, input: &AffordabilityInput) -> LoanCalcResult<Percent> {
    unrounded_dti(payment, input.monthly_income, input.monthly_expenses).ok_or_else(|| {
        LoanCalcError::DivisionByZero {
            context: "DTI ratio (monthly income)".into(),
        }
    })
}

pub(crate) fn maturity_age(borrower_age: u32, term_years: u32) -> LoanCalcResult<u32> {
    borrower_age.checked_add(term_years).ok_or_else(|| LoanCalcError::InvalidInput {
        field: "borrower_age".into(),
        reason: format!("Age {borrower_age} plus a {term_years}-year term is out of range."),
    })
}

pub(crate) fn credit_risk_level(score: u32, standards: &LendingStandards) -> CreditRiskLevel {
    if score < standards.min_credit_score {
        CreditRiskLevel::Poor
    } else if score < standards.good_credit_score {
        CreditRiskLevel::Fair
    } else if score < standards.excellent_credit_score {
        CreditRiskLevel::Good
    } else {
        CreditRiskLevel::Excellent
    }
}

fn validate_input(input: &AffordabilityInput) -> LoanCalcResult<()> {
    let non_negative = [
        ("loan_amount", input.loan_amount),
        ("interest_rate", input.interest_rate),
        ("monthly_expenses", input.monthly_expenses),
    ];
    for (field, value) in non_negative {
        if value < Decimal::ZERO {
            return Err(LoanCalcError::InvalidInput {
                field: field.into(),
                reason: "Value cannot be negative.".into(),
            });
        }
    }
    if input.property_value <= Decimal::ZERO {
        return Err(LoanCalcError::InvalidInput {
            field: "property_value".into(),
            reason: "Property value must be positive.".into(),
        });
    }
    if input.monthly_income <= Decimal::ZERO {
        return Err(LoanCalcError::InvalidInput {
            field: "monthly_income".into(),
            reason: "Monthly income must be positive.".into(),
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
