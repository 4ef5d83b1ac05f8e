//! Amortization solver: level monthly payments and the inverse term solve.

pub mod annuity;
pub mod credit;
pub mod payment;
pub mod period;

pub use payment::{credit_annuity_payment, monthly_payment, remaining_amount};
pub use period::loan_period;
