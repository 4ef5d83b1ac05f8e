//! Resolution of business parameters (current rate, LTV ceilings, bounds and
//! lending standards) from an ordered chain of providers, with a TTL cache in
//! front and a compiled-in fallback behind.

pub mod cache;
pub mod model;
pub mod provider;
pub mod resolver;

pub use cache::{ParameterCache, DEFAULT_CACHE_TTL};
pub use model::CalculationParameters;
pub use provider::{FallbackProvider, ParameterProvider, ProviderChain, PushedProvider, StaticProvider};
pub use resolver::ParameterResolver;
