use tracing::debug;

use super::cache::ParameterCache;
use super::model::CalculationParameters;
use super::provider::{ParameterProvider, ProviderChain};
use crate::types::BusinessPath;

/// Cached front for a [`ProviderChain`].
#[derive(Debug, Default)]
pub struct ParameterResolver {
    chain: ProviderChain,
    cache: ParameterCache,
}

impl ParameterResolver {
    pub fn new(chain: ProviderChain, cache: ParameterCache) -> Self {
        Self { chain, cache }
    }

    /// Chain of `providers` in order, default TTL cache.
    pub fn from_providers(providers: Vec<Box<dyn ParameterProvider>>) -> Self {
        let mut chain = ProviderChain::new();
        for provider in providers {
            chain.push(provider);
        }
        Self::new(chain, ParameterCache::default())
    }

    pub fn cache(&self) -> &ParameterCache {
        &self.cache
    }

    /// Parameters for `path`, from cache when fresh.
    ///
    /// Fallback values are returned but not cached, so the next call retries
    /// the providers.
    pub fn resolve(&self, path: BusinessPath) -> CalculationParameters {
        if let Some(params) = self.cache.get(path) {
            debug!(%path, "calculation parameters served from cache");
            return params;
        }
        self.load(path)
    }

    /// Skip the cache and reload `path` from the providers.
    pub fn refresh(&self, path: BusinessPath) -> CalculationParameters {
        self.cache.invalidate(path);
        self.load(path)
    }

    fn load(&self, path: BusinessPath) -> CalculationParameters {
        let params = self.chain.resolve(path);
        if !params.is_fallback {
            self.cache.set(params.clone());
        }
        params
    }
}
