//! Grant set caching keyed on grant-store version.
//!
//! Resolving a principal's grants is the one step every query repeats, so
//! the resolver can memoise it in a [`GrantCache`]. Keys include the grant
//! store's version: any record change moves readers onto fresh keys and
//! stale entries simply age out through the TTL.
//!
//! # Cache Safety
//!
//! Caching is **disabled** by default. Only enable it when the grant store
//! reports a real version (see
//! [`GrantReader::version`](crate::resolver::GrantReader::version));
//! with the default constant version, cached grants would outlive record
//! edits until TTL expiry.
//!
//! # Example
//!
//! ```rust,ignore
//! use permtree_domain::cache::{GrantCache, GrantCacheConfig};
//!
//! let cache = GrantCache::new(GrantCacheConfig::default().with_enabled(true));
//! let resolver = PermissionResolver::from_store(store)
//!     .with_config(ResolverConfig::default().with_cache(Arc::new(cache)));
//! ```

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use crate::model::Principal;
use crate::resolver::GrantSet;

/// Configuration for the grant cache.
#[derive(Debug, Clone)]
pub struct GrantCacheConfig {
    /// Whether caching is enabled. Defaults to `false`.
    pub enabled: bool,
    /// Maximum number of cached grant sets.
    pub max_capacity: u64,
    /// Time-to-live for each entry.
    pub ttl: Duration,
}

impl Default for GrantCacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_capacity: 10_000,
            ttl: Duration::from_secs(60),
        }
    }
}

impl GrantCacheConfig {
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_max_capacity(mut self, max_capacity: u64) -> Self {
        self.max_capacity = max_capacity;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// Cache key: a principal at a given grant-store version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GrantCacheKey {
    pub principal: Principal,
    pub version: u64,
}

impl GrantCacheKey {
    pub fn new(principal: Principal, version: u64) -> Self {
        Self { principal, version }
    }
}

/// Concurrent cache of resolved grant sets.
pub struct GrantCache {
    cache: Cache<GrantCacheKey, Arc<GrantSet>>,
    config: GrantCacheConfig,
}

impl std::fmt::Debug for GrantCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrantCache")
            .field("config", &self.config)
            .field("entry_count", &self.cache.entry_count())
            .finish()
    }
}

impl GrantCache {
    pub fn new(config: GrantCacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(config.ttl)
            .build();
        Self { cache, config }
    }

    pub fn config(&self) -> &GrantCacheConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Returns the cached grant set, or `None` on a miss or when disabled.
    pub async fn get(&self, key: &GrantCacheKey) -> Option<Arc<GrantSet>> {
        if !self.config.enabled {
            return None;
        }
        let hit = self.cache.get(key).await;
        tracing::trace!(principal = %key.principal, version = key.version, hit = hit.is_some(), "grant cache lookup");
        hit
    }

    /// Stores a grant set. No-op when disabled.
    pub async fn insert(&self, key: GrantCacheKey, grants: Arc<GrantSet>) {
        if self.config.enabled {
            self.cache.insert(key, grants).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PermissionRecord;

    fn grants(id: &str) -> Arc<GrantSet> {
        Arc::new(GrantSet::from_records(vec![PermissionRecord::new(id)]))
    }

    #[tokio::test]
    async fn test_disabled_cache_never_hits() {
        let cache = GrantCache::new(GrantCacheConfig::default());
        let key = GrantCacheKey::new(Principal::user("alice"), 1);
        cache.insert(key.clone(), grants("p1")).await;
        assert!(cache.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn test_enabled_cache_hits_same_version_only() {
        let cache = GrantCache::new(GrantCacheConfig::default().with_enabled(true));
        let key = GrantCacheKey::new(Principal::user("alice"), 1);
        cache.insert(key.clone(), grants("p1")).await;

        assert_eq!(cache.get(&key).await.map(|g| g.len()), Some(1));
        let next_version = GrantCacheKey::new(Principal::user("alice"), 2);
        assert!(cache.get(&next_version).await.is_none());
    }
}
