//! Configuration for the permission resolver.

use std::sync::Arc;

use crate::cache::GrantCache;

/// Configuration for the permission resolver.
#[derive(Debug, Clone, Default)]
pub struct ResolverConfig {
    /// Optional grant set cache.
    ///
    /// When enabled, the resolver looks up a principal's grants by
    /// `(principal, grant-store version)` before querying the grant store,
    /// and stores freshly resolved grant sets afterwards.
    pub cache: Option<Arc<GrantCache>>,
}

impl ResolverConfig {
    /// Creates a new configuration with caching enabled.
    pub fn with_cache(mut self, cache: Arc<GrantCache>) -> Self {
        self.cache = Some(cache);
        self
    }
}
