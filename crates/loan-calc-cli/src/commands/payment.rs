use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_calc_core::amortization::credit::{
    self, CreditPaymentInput, RemainingAmountInput,
};
use loan_calc_core::amortization::payment::{self, PaymentInput};
use loan_calc_core::amortization::period::{self, PeriodInput};
use loan_calc_core::parameters::ParameterResolver;
use loan_calc_core::BusinessPath;

use crate::input;

/// Arguments for the mortgage payment calculation
#[derive(Args)]
pub struct PaymentArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan amount
    #[arg(long, alias = "amount")]
    pub loan_amount: Option<Decimal>,

    /// Annual interest rate in percent; defaults to the current mortgage rate
    #[arg(long, alias = "rate")]
    pub interest_rate: Option<Decimal>,

    /// Term in whole years
    #[arg(long, alias = "term")]
    pub term_years: Option<u32>,
}

/// Arguments for the term solve
#[derive(Args)]
pub struct PeriodArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long, alias = "amount")]
    pub loan_amount: Option<Decimal>,

    #[arg(long, alias = "rate")]
    pub interest_rate: Option<Decimal>,

    #[arg(long, alias = "payment")]
    pub monthly_payment: Option<Decimal>,
}

/// Arguments for the consumer credit instalment
#[derive(Args)]
pub struct CreditPaymentArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Credit amount
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Term in years, fractions allowed
    #[arg(long, alias = "term")]
    pub term_years: Option<Decimal>,

    /// Annual interest rate in percent; defaults to the current credit rate
    #[arg(long, alias = "rate")]
    pub interest_rate: Option<Decimal>,
}

/// Arguments for the payoff amount
#[derive(Args)]
pub struct RemainingArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Outstanding balance
    #[arg(long)]
    pub balance: Option<Decimal>,

    #[arg(long, alias = "years")]
    pub years_remaining: Option<Decimal>,

    #[arg(long, alias = "rate")]
    pub interest_rate: Option<Decimal>,
}

pub fn run_payment(args: PaymentArgs, resolver: &ParameterResolver) -> Result<Value, Box<dyn std::error::Error>> {
    let payment_input: PaymentInput = match input::read_input(args.input.as_deref())? {
        Some(data) => data,
        None => PaymentInput {
            loan_amount: args.loan_amount
                .ok_or("--loan-amount is required (or provide --input)")?,
            interest_rate: args.interest_rate
                .unwrap_or_else(|| resolver.resolve(BusinessPath::Mortgage).current_interest_rate),
            term_years: args.term_years
                .ok_or("--term-years is required (or provide --input)")?,
        },
    };

    let result = payment::calculate_payment(&payment_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_period(args: PeriodArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let period_input: PeriodInput = match input::read_input(args.input.as_deref())? {
        Some(data) => data,
        None => PeriodInput {
            loan_amount: args.loan_amount
                .ok_or("--loan-amount is required (or provide --input)")?,
            interest_rate: args.interest_rate
                .ok_or("--interest-rate is required (or provide --input)")?,
            monthly_payment: args.monthly_payment
                .ok_or("--monthly-payment is required (or provide --input)")?,
        },
    };

    let result = period::calculate_period(&period_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_credit_payment(
    args: CreditPaymentArgs,
    resolver: &ParameterResolver,
) -> Result<Value, Box<dyn std::error::Error>> {
    let credit_input: CreditPaymentInput = match input::read_input(args.input.as_deref())? {
        Some(data) => data,
        None => CreditPaymentInput {
            amount: args.amount
                .ok_or("--amount is required (or provide --input)")?,
            term_years: args.term_years
                .ok_or("--term-years is required (or provide --input)")?,
            interest_rate: args.interest_rate
                .unwrap_or_else(|| resolver.resolve(BusinessPath::Credit).current_interest_rate),
        },
    };

    let result = credit::calculate_credit_payment(&credit_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_remaining(args: RemainingArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let remaining_input: RemainingAmountInput = match input::read_input(args.input.as_deref())? {
        Some(data) => data,
        None => RemainingAmountInput {
            balance: args.balance
                .ok_or("--balance is required (or provide --input)")?,
            years_remaining: args.years_remaining
                .ok_or("--years-remaining is required (or provide --input)")?,
            interest_rate: args.interest_rate
                .ok_or("--interest-rate is required (or provide --input)")?,
        },
    };

    let result = credit::calculate_remaining_amount(&remaining_input)?;
    Ok(serde_json::to_value(result)?)
}
