use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_calc_core::loan_limits::PropertyOwnership;
use loan_calc_core::parameters::ParameterResolver;
use loan_calc_core::validation::CalculationParams;
use loan_calc_core::BusinessPath;

use crate::input;

/// Arguments for request validation
#[derive(Args)]
pub struct ValidateArgs {
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
}

/// Validation never fails the command; violations are part of the result.
pub fn run_validate(args: ValidateArgs, resolver: &ParameterResolver) -> Result<Value, Box<dyn std::error::Error>> {
    let parameters = resolver.resolve(BusinessPath::Mortgage);

    let request: CalculationParams = match input::read_input(args.input.as_deref())? {
        Some(data) => data,
        None => CalculationParams {
            loan_amount: args.loan_amount
                .ok_or("--loan-amount is required (or provide --input)")?,
            interest_rate: args.interest_rate.unwrap_or(parameters.current_interest_rate),
            term_years: args.term_years
                .ok_or("--term-years is required (or provide --input)")?,
            property_value: args.property_value
                .ok_or("--property-value is required (or provide --input)")?,
            property_ownership: PropertyOwnership::parse_lossy(&args.property_ownership),
        },
    };

    let result = parameters.validator()?.validate(&request);
    Ok(serde_json::json!({ "result": result }))
}
