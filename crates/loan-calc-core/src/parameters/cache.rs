use std::time::Duration;

use moka::sync::Cache;

use super::model::CalculationParameters;
use crate::types::BusinessPath;

/// How long resolved parameters stay fresh.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Resolved parameters per business path, expiring after a fixed TTL.
///
/// Cloning is cheap and clones share the same storage.
#[derive(Clone)]
pub struct ParameterCache {
    inner: Cache<BusinessPath, CalculationParameters>,
    ttl: Duration,
}

impl ParameterCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Cache::builder().time_to_live(ttl).max_capacity(16).build(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, path: BusinessPath) -> Option<CalculationParameters> {
        self.inner.get(&path)
    }

    pub fn set(&self, params: CalculationParameters) {
        self.inner.insert(params.business_path, params);
    }

    pub fn invalidate(&self, path: BusinessPath) {
        self.inner.invalidate(&path);
    }

    pub fn clear(&self) {
        self.inner.invalidate_all();
    }
}

impl Default for ParameterCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

impl std::fmt::Debug for ParameterCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParameterCache")
            .field("ttl", &self.ttl)
            .field("entries", &self.inner.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_invalidate() {
        let cache = ParameterCache::default();
        assert_eq!(cache.ttl(), Duration::from_secs(300));
        assert!(cache.get(BusinessPath::Mortgage).is_none());

        cache.set(CalculationParameters::fallback(BusinessPath::Mortgage));
        assert!(cache.get(BusinessPath::Mortgage).is_some());
        assert!(cache.get(BusinessPath::Credit).is_none());

        cache.invalidate(BusinessPath::Mortgage);
        assert!(cache.get(BusinessPath::Mortgage).is_none());
    }

    #[test]
    fn test_clear_drops_every_path() {
        let cache = ParameterCache::default();
        cache.set(CalculationParameters::fallback(BusinessPath::Mortgage));
        cache.set(CalculationParameters::fallback(BusinessPath::Credit));
        cache.clear();
        assert!(cache.get(BusinessPath::Mortgage).is_none());
        assert!(cache.get(BusinessPath::Credit).is_none());
    }

    #[test]
    fn test_entries_expire() {
        let cache = ParameterCache::new(Duration::from_millis(50));
        cache.set(CalculationParameters::fallback(BusinessPath::Credit));
        std::thread::sleep(Duration::from_millis(150));
        assert!(cache.get(BusinessPath::Credit).is_none());
    }

    #[test]
    fn test_clones_share_storage() {
        let cache = ParameterCache::default();
        let other = cache.clone();
        other.set(CalculationParameters::fallback(BusinessPath::Credit));
        assert!(cache.get(BusinessPath::Credit).is_some());
    }
}
