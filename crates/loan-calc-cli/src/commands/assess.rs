use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_calc_core::assessment::{
    assess_affordability, assess_credit, AffordabilityInput, CreditAffordabilityInput,
};
use loan_calc_core::loan_limits::PropertyOwnership;
use loan_calc_core::parameters::ParameterResolver;
use loan_calc_core::BusinessPath;

use crate::input;

/// Arguments for the affordability assessment
#[derive(Args)]
pub struct AssessArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long, alias = "amount")]
    pub loan_amount: Option<Decimal>,

    /// Annual interest rate in percent; defaults to the current mortgage rate
    #[arg(long, alias = "rate")]
    pub interest_rate: Option<Decimal>,

    #[arg(long, alias = "term")]
    pub term_years: Option<u32>,

    #[arg(long, alias = "value")]
    pub property_value: Option<Decimal>,

    /// no_property, has_property or selling_property
    #[arg(long, alias = "ownership", default_value = "no_property")]
    pub property_ownership: String,

    #[arg(long, alias = "income")]
    pub monthly_income: Option<Decimal>,

    /// Existing monthly obligations
    #[arg(long, alias = "expenses", default_value = "0")]
    pub monthly_expenses: Decimal,

    #[arg(long, alias = "age")]
    pub borrower_age: Option<u32>,

    #[arg(long)]
    pub credit_score: Option<u32>,

    #[arg(long)]
    pub employment_years: Option<Decimal>,
}

pub fn run_assess(args: AssessArgs, resolver: &ParameterResolver) -> Result<Value, Box<dyn std::error::Error>> {
    let parameters = resolver.resolve(BusinessPath::Mortgage);

    let request: AffordabilityInput = match input::read_input(args.input.as_deref())? {
        Some(data) => data,
        None => AffordabilityInput {
            loan_amount: args.loan_amount
                .ok_or("--loan-amount is required (or provide --input)")?,
            interest_rate: args.interest_rate.unwrap_or(parameters.current_interest_rate),
            term_years: args.term_years
                .ok_or("--term-years is required (or provide --input)")?,
            property_value: args.property_value
                .ok_or("--property-value is required (or provide --input)")?,
            property_ownership: PropertyOwnership::parse_lossy(&args.property_ownership),
            monthly_income: args.monthly_income
                .ok_or("--monthly-income is required (or provide --input)")?,
            monthly_expenses: args.monthly_expenses,
            borrower_age: args.borrower_age
                .ok_or("--borrower-age is required (or provide --input)")?,
            credit_score: args.credit_score,
            employment_years: args.employment_years,
        },
    };

    let result = assess_affordability(&request, &parameters.standards, &parameters.ltv)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for the consumer credit assessment
#[derive(Args)]
pub struct AssessCreditArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Annual interest rate in percent; defaults to the current credit rate
    #[arg(long, alias = "rate")]
    pub interest_rate: Option<Decimal>,

    #[arg(long, alias = "term")]
    pub term_years: Option<u32>,

    #[arg(long, alias = "income")]
    pub monthly_income: Option<Decimal>,

    #[arg(long, alias = "expenses", default_value = "0")]
    pub monthly_expenses: Decimal,

    /// Instalments on credit already drawn
    #[arg(long, alias = "debts", default_value = "0")]
    pub existing_debts: Decimal,

    #[arg(long, alias = "age")]
    pub borrower_age: Option<u32>,

    #[arg(long)]
    pub credit_score: Option<u32>,

    #[arg(long)]
    pub employment_years: Option<Decimal>,
}

pub fn run_assess_credit(
    args: AssessCreditArgs,
    resolver: &ParameterResolver,
) -> Result<Value, Box<dyn std::error::Error>> {
    let parameters = resolver.resolve(BusinessPath::Credit);

    let request: CreditAffordabilityInput = match input::read_input(args.input.as_deref())? {
        Some(data) => data,
        None => CreditAffordabilityInput {
            amount: args.amount
                .ok_or("--amount is required (or provide --input)")?,
            interest_rate: args.interest_rate.unwrap_or(parameters.current_interest_rate),
            term_years: args.term_years
                .ok_or("--term-years is required (or provide --input)")?,
            monthly_income: args.monthly_income
                .ok_or("--monthly-income is required (or provide --input)")?,
            monthly_expenses: args.monthly_expenses,
            existing_debts: args.existing_debts,
            borrower_age: args.borrower_age
                .ok_or("--borrower-age is required (or provide --input)")?,
            credit_score: args.credit_score,
            employment_years: args.employment_years,
        },
    };

    let result = assess_credit(&request, &parameters.standards)?;
    Ok(serde_json::to_value(result)?)
}
