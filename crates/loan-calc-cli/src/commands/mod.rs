pub mod assess;
pub mod limits;
pub mod parameters;
pub mod payment;
pub mod validate;
