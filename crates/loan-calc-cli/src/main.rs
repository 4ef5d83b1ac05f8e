mod commands;
mod input;
mod output;
mod params;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::assess::{AssessArgs, AssessCreditArgs};
use commands::limits::{DtiArgs, LimitsArgs};
use commands::parameters::ParametersArgs;
use commands::payment::{CreditPaymentArgs, PaymentArgs, PeriodArgs, RemainingArgs};
use commands::validate::ValidateArgs;

/// Mortgage and consumer credit calculations
#[derive(Parser)]
#[command(
    name = "loancalc",
    version,
    about = "Mortgage and consumer credit calculations",
    long_about = "A CLI for mortgage and consumer credit calculations with decimal \
                  precision. Supports monthly payments, term solving, LTV limits, \
                  DTI ratios, request validation and affordability assessment."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Parameter file (JSON or YAML) adopted ahead of the built-in defaults
    #[arg(long, env = "LOANCALC_PARAMS", global = true)]
    params: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Monthly payment for a fixed-rate mortgage
    Payment(PaymentArgs),
    /// Solve the term for a given monthly payment
    Period(PeriodArgs),
    /// Monthly instalment on a consumer credit
    CreditPayment(CreditPaymentArgs),
    /// Payoff amount on an existing balance
    Remaining(RemainingArgs),
    /// Maximum loan and minimum down payment for a property
    Limits(LimitsArgs),
    /// Debt-to-income ratio
    Dti(DtiArgs),
    /// Check a request against bounds and LTV ceilings
    Validate(ValidateArgs),
    /// Full mortgage affordability assessment
    Assess(AssessArgs),
    /// Consumer credit affordability assessment
    AssessCredit(AssessCreditArgs),
    /// Show the resolved calculation parameters
    Parameters(ParametersArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    // stdout carries results; diagnostics go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let resolver = params::build_resolver(cli.params.as_deref());

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Payment(args) => commands::payment::run_payment(args, &resolver),
        Commands::Period(args) => commands::payment::run_period(args),
        Commands::CreditPayment(args) => commands::payment::run_credit_payment(args, &resolver),
        Commands::Remaining(args) => commands::payment::run_remaining(args),
        Commands::Limits(args) => commands::limits::run_limits(args, &resolver),
        Commands::Dti(args) => commands::limits::run_dti(args, &resolver),
        Commands::Validate(args) => commands::validate::run_validate(args, &resolver),
        Commands::Assess(args) => commands::assess::run_assess(args, &resolver),
        Commands::AssessCredit(args) => commands::assess::run_assess_credit(args, &resolver),
        Commands::Parameters(args) => commands::parameters::run_parameters(args, &resolver),
        Commands::Version => {
            println!("loancalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
