pub mod dti;

pub use dti::{dti_ratio, loan_to_value};
