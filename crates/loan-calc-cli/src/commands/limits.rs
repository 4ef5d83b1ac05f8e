use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_calc_core::loan_limits::limits::{self, LoanLimitInput};
use loan_calc_core::loan_limits::PropertyOwnership;
use loan_calc_core::parameters::ParameterResolver;
use loan_calc_core::ratios::dti::{self, DtiInput};
use loan_calc_core::BusinessPath;

use crate::input;

/// Arguments for loan limits by property ownership
#[derive(Args)]
pub struct LimitsArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Property value
    #[arg(long, alias = "value")]
    pub property_value: Option<Decimal>,

    /// no_property, has_property or selling_property
    #[arg(long, alias = "ownership", default_value = "no_property")]
    pub property_ownership: String,

    /// Down payment to check against the minimum
    #[arg(long)]
    pub down_payment: Option<Decimal>,
}

/// Arguments for the debt-to-income ratio
#[derive(Args)]
pub struct DtiArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Proposed monthly payment
    #[arg(long, alias = "payment")]
    pub proposed_monthly_payment: Option<Decimal>,

    #[arg(long, alias = "income")]
    pub monthly_income: Option<Decimal>,

    #[arg(long, alias = "debts", default_value = "0")]
    pub existing_monthly_debts: Decimal,

    /// DTI ceiling in percent; defaults to the lending standard
    #[arg(long)]
    pub max_dti: Option<Decimal>,
}

pub fn run_limits(args: LimitsArgs, resolver: &ParameterResolver) -> Result<Value, Box<dyn std::error::Error>> {
    let mut limit_input: LoanLimitInput = match input::read_input(args.input.as_deref())? {
        Some(data) => data,
        None => LoanLimitInput {
            property_value: args.property_value
                .ok_or("--property-value is required (or provide --input)")?,
            property_ownership: PropertyOwnership::parse_lossy(&args.property_ownership),
            down_payment: args.down_payment,
            ltv_table: None,
        },
    };
    if limit_input.ltv_table.is_none() {
        limit_input.ltv_table = Some(resolver.resolve(BusinessPath::Mortgage).ltv);
    }

    let result = limits::derive_loan_limits(&limit_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_dti(args: DtiArgs, resolver: &ParameterResolver) -> Result<Value, Box<dyn std::error::Error>> {
    let mut dti_input: DtiInput = match input::read_input(args.input.as_deref())? {
        Some(data) => data,
        None => DtiInput {
            proposed_monthly_payment: args.proposed_monthly_payment
                .ok_or("--proposed-monthly-payment is required (or provide --input)")?,
            monthly_income: args.monthly_income
                .ok_or("--monthly-income is required (or provide --input)")?,
            existing_monthly_debts: args.existing_monthly_debts,
            max_dti: args.max_dti,
        },
    };
    if dti_input.max_dti.is_none() {
        dti_input.max_dti = Some(resolver.resolve(BusinessPath::Mortgage).standards.max_dti);
    }

    let result = dti::calculate_dti(&dti_input)?;
    Ok(serde_json::to_value(result)?)
}
