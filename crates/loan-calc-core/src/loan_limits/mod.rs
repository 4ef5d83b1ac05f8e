//! Loan-to-value ceilings by property ownership and the limits derived from them.

pub mod limits;
pub mod ownership;

pub use limits::{ltv_ratio, max_loan_amount, min_down_payment};
pub use ownership::{LtvTable, PropertyOwnership};
