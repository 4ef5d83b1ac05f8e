use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use super::model::CalculationParameters;
use crate::{types::BusinessPath, LoanCalcError, LoanCalcResult};

/// A source of calculation parameters (database, remote API, file, defaults).
pub trait ParameterProvider: Send + Sync {
    fn name(&self) -> &str;

    fn load(&self, path: BusinessPath) -> LoanCalcResult<CalculationParameters>;
}

/// In-memory parameters keyed by business path.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    name: String,
    entries: HashMap<BusinessPath, CalculationParameters>,
}

impl StaticProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: HashMap::new(),
        }
    }

    pub fn with(mut self, params: CalculationParameters) -> Self {
        self.insert(params);
        self
    }

    pub fn insert(&mut self, params: CalculationParameters) {
        self.entries.insert(params.business_path, params);
    }
}

impl ParameterProvider for StaticProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self, path: BusinessPath) -> LoanCalcResult<CalculationParameters> {
        self.entries.get(&path).cloned().ok_or_else(|| {
            LoanCalcError::Configuration(format!("{}: no parameters for {path}", self.name))
        })
    }
}

/// Parameters pushed in at runtime by an embedding host.
///
/// Clones share one table, so the host keeps a handle while the chain owns
/// another. Entries never expire; a push replaces the set for its path.
#[derive(Debug, Clone, Default)]
pub struct PushedProvider {
    name: String,
    entries: Arc<RwLock<HashMap<BusinessPath, CalculationParameters>>>,
}

impl PushedProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Arc::default(),
        }
    }

    pub fn push(&self, params: CalculationParameters) -> LoanCalcResult<()> {
        let mut entries = self.entries.write().map_err(|_| self.poisoned())?;
        entries.insert(params.business_path, params);
        Ok(())
    }

    pub fn clear(&self) -> LoanCalcResult<()> {
        self.entries.write().map_err(|_| self.poisoned())?.clear();
        Ok(())
    }

    fn poisoned(&self) -> LoanCalcError {
        LoanCalcError::Configuration(format!("{}: parameter table lock poisoned", self.name))
    }
}

impl ParameterProvider for PushedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self, path: BusinessPath) -> LoanCalcResult<CalculationParameters> {
        let entries = self.entries.read().map_err(|_| self.poisoned())?;
        entries.get(&path).cloned().ok_or_else(|| {
            LoanCalcError::Configuration(format!("{}: nothing pushed for {path}", self.name))
        })
    }
}

/// Compiled-in defaults. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackProvider;

impl ParameterProvider for FallbackProvider {
    fn name(&self) -> &str {
        "fallback"
    }

    fn load(&self, path: BusinessPath) -> LoanCalcResult<CalculationParameters> {
        Ok(CalculationParameters::fallback(path))
    }
}

/// Providers tried in order; the first valid answer wins.
#[derive(Default)]
pub struct ProviderChain {
    providers: Vec<Box<dyn ParameterProvider>>,
}

impl ProviderChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(mut self, provider: impl ParameterProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn push(&mut self, provider: Box<dyn ParameterProvider>) {
        self.providers.push(provider);
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Resolve parameters for `path`. Provider errors and invalid parameter
    /// sets are logged and skipped; when nothing usable remains the
    /// compiled-in fallback is returned.
    pub fn resolve(&self, path: BusinessPath) -> CalculationParameters {
        for provider in &self.providers {
            match provider.load(path).and_then(|p| p.validate().map(|_| p)) {
                Ok(params) => {
                    debug!(provider = provider.name(), %path, "adopted calculation parameters");
                    return params;
                }
                Err(err) => {
                    warn!(provider = provider.name(), %path, error = %err, "parameter provider failed");
                }
            }
        }
        warn!(%path, "all parameter providers failed, using compiled-in fallback");
        CalculationParameters::fallback(path)
    }
}

impl std::fmt::Debug for ProviderChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderChain")
            .field("providers", &self.provider_names())
            .finish()
    }
}
