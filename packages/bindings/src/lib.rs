use std::sync::OnceLock;

use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use loan_calc_core::parameters::{
    CalculationParameters, FallbackProvider, ParameterResolver, PushedProvider,
};
use loan_calc_core::{BusinessPath, LoanCalcError};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Parameter sets pushed by the host through `set_parameters`.
fn host() -> &'static PushedProvider {
    static HOST: OnceLock<PushedProvider> = OnceLock::new();
    HOST.get_or_init(|| PushedProvider::new("host"))
}

/// Process-wide resolver: host-pushed sets first, built-in defaults behind.
fn resolver() -> &'static ParameterResolver {
    static RESOLVER: OnceLock<ParameterResolver> = OnceLock::new();
    RESOLVER.get_or_init(|| {
        ParameterResolver::from_providers(vec![Box::new(host().clone()), Box::new(FallbackProvider)])
    })
}

fn parse_path(path: &str) -> NapiResult<BusinessPath> {
    path.parse::<BusinessPath>().map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_payment(input_json: String) -> NapiResult<String> {
    let input: loan_calc_core::amortization::payment::PaymentInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        loan_calc_core::amortization::payment::calculate_payment(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_period(input_json: String) -> NapiResult<String> {
    let input: loan_calc_core::amortization::period::PeriodInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        loan_calc_core::amortization::period::calculate_period(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_credit_payment(input_json: String) -> NapiResult<String> {
    let input: loan_calc_core::amortization::credit::CreditPaymentInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = loan_calc_core::amortization::credit::calculate_credit_payment(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_remaining_amount(input_json: String) -> NapiResult<String> {
    let input: loan_calc_core::amortization::credit::RemainingAmountInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = loan_calc_core::amortization::credit::calculate_remaining_amount(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Limits and ratios
// ---------------------------------------------------------------------------

#[napi]
pub fn loan_limits(input_json: String) -> NapiResult<String> {
    let mut input: loan_calc_core::loan_limits::limits::LoanLimitInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    if input.ltv_table.is_none() {
        input.ltv_table = Some(resolver().resolve(BusinessPath::Mortgage).ltv);
    }
    let output =
        loan_calc_core::loan_limits::limits::derive_loan_limits(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn debt_to_income(input_json: String) -> NapiResult<String> {
    let mut input: loan_calc_core::ratios::dti::DtiInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    if input.max_dti.is_none() {
        input.max_dti = Some(resolver().resolve(BusinessPath::Mortgage).standards.max_dti);
    }
    let output = loan_calc_core::ratios::dti::calculate_dti(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Validation and assessment
// ---------------------------------------------------------------------------

#[napi]
pub fn validate_request(input_json: String) -> NapiResult<String> {
    let input: loan_calc_core::validation::CalculationParams =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let result = resolver()
        .resolve(BusinessPath::Mortgage)
        .validator()
        .map_err(to_napi_error)?
        .validate(&input);
    serde_json::to_string(&result).map_err(to_napi_error)
}

#[napi]
pub fn assess_affordability(input_json: String) -> NapiResult<String> {
    let input: loan_calc_core::assessment::AffordabilityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let params = resolver().resolve(BusinessPath::Mortgage);
    let output = loan_calc_core::assessment::assess_affordability(&input, &params.standards, &params.ltv)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn assess_credit(input_json: String) -> NapiResult<String> {
    let input: loan_calc_core::assessment::CreditAffordabilityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let params = resolver().resolve(BusinessPath::Credit);
    let output = loan_calc_core::assessment::assess_credit(&input, &params.standards)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

#[napi]
pub fn get_parameters(path: String) -> NapiResult<String> {
    let params = resolver().resolve(parse_path(&path)?);
    serde_json::to_string(&params).map_err(to_napi_error)
}

/// Adopt parameters fetched by the host (rates API, database).
/// Accepts one parameter set or a list. Pushed sets stay in force until
/// replaced or cleared; the resolver cache only fronts them.
#[napi]
pub fn set_parameters(params_json: String) -> NapiResult<()> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Incoming {
        Many(Vec<CalculationParameters>),
        One(CalculationParameters),
    }

    let incoming: Incoming = serde_json::from_str(&params_json).map_err(to_napi_error)?;
    let all = match incoming {
        Incoming::Many(all) => all,
        Incoming::One(one) => vec![one],
    };
    for params in &all {
        params.validate().map_err(to_napi_error)?;
        if params.is_fallback {
            return Err(to_napi_error(LoanCalcError::Configuration(
                "refusing to adopt parameters marked as fallback".into(),
            )));
        }
    }
    for params in all {
        let path = params.business_path;
        host().push(params).map_err(to_napi_error)?;
        resolver().refresh(path);
    }
    Ok(())
}

/// Drop every pushed set; the built-in defaults apply again.
#[napi]
pub fn clear_parameters() -> NapiResult<()> {
    host().clear().map_err(to_napi_error)?;
    resolver().cache().clear();
    Ok(())
}
