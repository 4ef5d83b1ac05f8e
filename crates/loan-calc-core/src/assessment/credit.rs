use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::affordability::{credit_risk_level, maturity_age, CreditRiskLevel};
use super::standards::LendingStandards;
use crate::amortization::monthly_payment;
use crate::amortization::payment::lifetime_totals;
use crate::ratios::dti::unrounded_dti;
use crate::{types::*, LoanCalcError, LoanCalcResult};

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditAffordabilityInput {
    pub amount: Money,
    /// Annual interest rate in percent (8.5 = 8.5%).
    pub interest_rate: Percent,
    pub term_years: u32,
    pub monthly_income: Money,
    /// Recurring household outgoings.
    #[serde(default)]
    pub monthly_expenses: Money,
    /// Instalments on credit already drawn.
    #[serde(default)]
    pub existing_debts: Money,
    pub borrower_age: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_score: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employment_years: Option<Years>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditAffordabilityChecks {
    pub dti: bool,
    pub credit_to_income: bool,
    pub age_at_maturity: bool,
    pub stress_test: bool,
    pub credit_score: bool,
    pub employment: bool,
}

impl CreditAffordabilityChecks {
    fn all(&self) -> bool {
        self.dti
            && self.credit_to_income
            && self.age_at_maturity
            && self.stress_test
            && self.credit_score
            && self.employment
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditAffordabilityOutput {
    pub monthly_payment: Money,
    pub total_payment: Money,
    pub total_interest: Money,
    pub dti_ratio: Percent,
    /// Credit amount as a percentage of annual income.
    pub credit_to_income_ratio: Percent,
    pub stress_rate: Percent,
    pub stress_monthly_payment: Money,
    pub stress_dti_ratio: Percent,
    pub age_at_maturity: u32,
    pub credit_risk_level: Option<CreditRiskLevel>,
    pub checks: CreditAffordabilityChecks,
    pub approved: bool,
    pub rejection_reasons: Vec<String>,
    pub approval_conditions: Vec<String>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Decide whether an unsecured consumer credit request is affordable.
///
/// The DTI counts the new instalment, household expenses and existing debts.
/// The amount is also capped against annual income, and the stress test adds
/// `standards.stress_rate_margin` to the contract rate.
pub fn assess_credit(
    input: &CreditAffordabilityInput,
    standards: &LendingStandards,
) -> LoanCalcResult<ComputationOutput<CreditAffordabilityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let payment = monthly_payment(input.amount, input.interest_rate, input.term_years)
        .ok_or_else(|| {
            LoanCalcError::FinancialImpossibility("Monthly payment is undefined for this request".into())
        })?;
    let (_, total_payment, total_interest) =
        lifetime_totals(payment, input.amount, input.term_years)?;

    let obligations = input
        .monthly_expenses
        .checked_add(input.existing_debts)
        .ok_or_else(|| {
            LoanCalcError::FinancialImpossibility("Monthly obligations are out of range".into())
        })?;

    // -- DTI ------------------------------------------------------------------
    let dti = income_ratio(payment, obligations, input.monthly_income)?;
    let dti_ok = dti <= standards.max_dti;

    // -- Credit to income -----------------------------------------------------
    let credit_to_income = input
        .monthly_income
        .checked_mul(dec!(12))
        .and_then(|annual| input.amount.checked_div(annual))
        .and_then(|share| share.checked_mul(dec!(100)))
        .ok_or_else(|| {
            LoanCalcError::FinancialImpossibility("Credit-to-income ratio is out of range".into())
        })?;
    let credit_to_income_ok = credit_to_income <= standards.max_credit_to_income;

    // -- Age ------------------------------------------------------------------
    let age_at_maturity = maturity_age(input.borrower_age, input.term_years)?;
    let age_ok = age_at_maturity <= standards.max_age_at_maturity;

    // -- Stress test ----------------------------------------------------------
    let stress_rate = standards.stress_rate(input.interest_rate);
    let stress_payment = monthly_payment(input.amount, stress_rate, input.term_years)
        .ok_or_else(|| {
            LoanCalcError::FinancialImpossibility("Stress payment is undefined for this request".into())
        })?;
    let stress_dti = income_ratio(stress_payment, obligations, input.monthly_income)?;
    let stress_ok = stress_dti <= standards.max_dti;

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

    let checks = CreditAffordabilityChecks {
        dti: dti_ok,
        credit_to_income: credit_to_income_ok,
        age_at_maturity: age_ok,
        stress_test: stress_ok,
        credit_score: credit_ok,
        employment: employment_ok,
    };

    let mut rejection_reasons = Vec::new();
    if !dti_ok {
        rejection_reasons.push(format!(
            "DTI ratio {}% exceeds maximum {}%",
            dti.round_dp(1).normalize(),
            standards.max_dti
        ));
    }
    if !credit_to_income_ok {
        rejection_reasons.push(format!(
            "Credit amount {}% of annual income exceeds maximum {}%",
            credit_to_income.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
            standards.max_credit_to_income
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
        rejection_reasons.push(format!(
            "Credit score {score} below minimum requirement {}",
            standards.min_credit_score
        ));
    }
    if let (false, Some(years)) = (employment_ok, input.employment_years) {
        rejection_reasons.push(format!(
            "Employment history {years} years below minimum {} years",
            standards.min_employment_years
        ));
    }

    let mut approval_conditions = Vec::new();
    if let Some(score) = input.credit_score {
        if score < standards.rate_premium_credit_score {
            approval_conditions.push("Higher interest rate due to credit score".to_string());
        }
    }
    if dti > standards.income_verification_dti {
        approval_conditions.push("Co-signer may be required".to_string());
    }
    if credit_to_income > standards.collateral_credit_to_income {
        approval_conditions.push("Additional collateral required".to_string());
    }

    let output = CreditAffordabilityOutput {
        monthly_payment: payment,
        total_payment,
        total_interest,
        dti_ratio: dti.round_dp(1),
        credit_to_income_ratio: credit_to_income.round_dp(1),
        stress_rate,
        stress_monthly_payment: stress_payment,
        stress_dti_ratio: stress_dti.round_dp(1),
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
        "monthly_expenses": input.monthly_expenses.to_string(),
        "existing_debts": input.existing_debts.to_string(),
    });

    Ok(with_metadata(
        "Consumer credit affordability (DTI, credit-to-income, stress test, age, credit, employment)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn income_ratio(payment: Money, obligations: Money, income: Money) -> LoanCalcResult<Percent> {
    unrounded_dti(payment, income, obligations).ok_or_else(|| LoanCalcError::DivisionByZero {
        context: "DTI ratio (monthly income)".into(),
    })
}

fn validate_input(input: &CreditAffordabilityInput) -> LoanCalcResult<()> {
    let non_negative = [
        ("amount", input.amount),
        ("interest_rate", input.interest_rate),
        ("monthly_expenses", input.monthly_expenses),
        ("existing_debts", input.existing_debts),
    ];
    for (field, value) in non_negative {
        if value < Decimal::ZERO {
            return Err(LoanCalcError::InvalidInput {
                field: field.into(),
                reason: "Value cannot be negative.".into(),
            });
        }
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

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn salaried_borrower() -> CreditAffordabilityInput {
        CreditAffordabilityInput {
            amount: dec!(100_000),
            interest_rate: dec!(8.5),
            term_years: 5,
            monthly_income: dec!(15_000),
            monthly_expenses: dec!(1_000),
            existing_debts: dec!(500),
            borrower_age: 40,
            credit_score: Some(720),
            employment_years: Some(dec!(4)),
        }
    }

    fn assess(input: &CreditAffordabilityInput) -> CreditAffordabilityOutput {
        assess_credit(input, &LendingStandards::credit()).unwrap().result
    }

    #[test]
    fn test_salaried_borrower_approved() {
        let out = assess(&salaried_borrower());
        // 100k / 5y / 8.5% = 2051.65 -> 2052
        assert_eq!(out.monthly_payment, dec!(2052));
        assert_eq!(out.total_payment, dec!(123_120));
        // (2052 + 1000 + 500) / 15000
        assert_eq!(out.dti_ratio, dec!(23.7));
        // 100k / 180k
        assert_eq!(out.credit_to_income_ratio, dec!(55.6));
        assert_eq!(out.credit_risk_level, Some(CreditRiskLevel::Good));
        assert!(out.approved);
        assert!(out.rejection_reasons.is_empty());
        assert!(out.approval_conditions.is_empty());
    }

    #[test]
    fn test_stress_rate_adds_margin() {
        let out = assess(&salaried_borrower());
        assert_eq!(out.stress_rate, dec!(10.5));
        // 100k / 5y / 10.5% = 2149.39 -> 2149
        assert_eq!(out.stress_monthly_payment, dec!(2149));
        assert_eq!(out.stress_dti_ratio, dec!(24.3));
    }

    #[test]
    fn test_overextended_borrower_reasons_and_conditions() {
        let input = CreditAffordabilityInput {
            amount: dec!(400_000),
            monthly_income: dec!(10_000),
            monthly_expenses: dec!(500),
            existing_debts: Decimal::ZERO,
            borrower_age: 45,
            credit_score: Some(650),
            employment_years: Some(dec!(1)),
            ..salaried_borrower()
        };
        let out = assess(&input);
        assert!(!out.approved);
        assert_eq!(out.credit_risk_level, Some(CreditRiskLevel::Fair));
        assert_eq!(out.rejection_reasons.len(), 4);
        assert!(out.rejection_reasons[0].starts_with("DTI ratio"));
        assert_eq!(
            out.rejection_reasons[1],
            "Credit amount 333% of annual income exceeds maximum 300%"
        );
        assert!(out.rejection_reasons[2].starts_with("Stress test DTI"));
        assert_eq!(
            out.rejection_reasons[3],
            "Employment history 1 years below minimum 2 years"
        );
        assert_eq!(
            out.approval_conditions,
            vec![
                "Higher interest rate due to credit score".to_string(),
                "Co-signer may be required".to_string(),
                "Additional collateral required".to_string(),
            ]
        );
    }

    #[test]
    fn test_low_score_rejected_with_minimum() {
        let mut input = salaried_borrower();
        input.credit_score = Some(600);
        let out = assess(&input);
        assert!(!out.checks.credit_score);
        assert_eq!(
            out.rejection_reasons,
            vec!["Credit score 600 below minimum requirement 620".to_string()]
        );
    }

    #[test]
    fn test_credit_bands() {
        let standards = LendingStandards::credit();
        assert_eq!(credit_risk_level(679, &standards), CreditRiskLevel::Fair);
        assert_eq!(credit_risk_level(680, &standards), CreditRiskLevel::Good);
        assert_eq!(credit_risk_level(750, &standards), CreditRiskLevel::Excellent);
    }

    #[test]
    fn test_maturity_after_seventy_rejected() {
        let mut input = salaried_borrower();
        input.borrower_age = 66;
        let out = assess(&input);
        assert_eq!(out.age_at_maturity, 71);
        assert_eq!(
            out.rejection_reasons,
            vec!["Age at maturity 71 exceeds maximum 70".to_string()]
        );
    }

    #[test]
    fn test_age_overflow_rejected() {
        let mut input = salaried_borrower();
        input.borrower_age = u32::MAX - 2;
        match assess_credit(&input, &LendingStandards::credit()).unwrap_err() {
            LoanCalcError::InvalidInput { field, .. } => assert_eq!(field, "borrower_age"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_history_warns() {
        let mut input = salaried_borrower();
        input.credit_score = None;
        input.employment_years = None;
        let result = assess_credit(&input, &LendingStandards::credit()).unwrap();
        assert!(result.result.approved);
        assert_eq!(result.warnings.len(), 2);
    }
}
