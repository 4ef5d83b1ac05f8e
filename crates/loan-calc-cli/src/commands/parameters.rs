use clap::Args;
use serde_json::Value;

use loan_calc_core::parameters::ParameterResolver;
use loan_calc_core::BusinessPath;

/// Arguments for showing resolved parameters
#[derive(Args)]
pub struct ParametersArgs {
    /// mortgage or credit
    #[arg(long, default_value = "mortgage")]
    pub path: BusinessPath,
}

pub fn run_parameters(args: ParametersArgs, resolver: &ParameterResolver) -> Result<Value, Box<dyn std::error::Error>> {
    let parameters = resolver.resolve(args.path);
    Ok(serde_json::json!({ "result": parameters }))
}
