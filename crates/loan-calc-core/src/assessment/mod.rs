//! Multi-criteria mortgage and consumer credit approval checks built on the calculators.

pub mod affordability;
pub mod credit;
pub mod standards;

pub use affordability::{assess_affordability, AffordabilityInput, AffordabilityOutput, CreditRiskLevel};
pub use credit::{assess_credit, CreditAffordabilityInput, CreditAffordabilityOutput};
pub use standards::LendingStandards;
