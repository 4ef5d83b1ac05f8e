pub mod amortization;
pub mod error;
pub mod loan_limits;
pub mod ratios;
pub mod rounding;
pub mod types;
pub mod validation;

#[cfg(feature = "assessment")]
pub mod assessment;

#[cfg(feature = "parameters")]
pub mod parameters;

pub use error::LoanCalcError;
pub use types::*;

/// Standard result type for all loan-calc operations
pub type LoanCalcResult<T> = Result<T, LoanCalcError>;
