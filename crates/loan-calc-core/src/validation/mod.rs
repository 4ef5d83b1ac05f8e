//! Request validation against static bounds and the LTV ceiling.

pub mod bounds;
pub mod validator;

pub use bounds::{CalculationParams, ValidationBounds};
pub use validator::{validate, ValidationResult, Validator};
