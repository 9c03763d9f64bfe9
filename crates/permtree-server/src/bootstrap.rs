//! Builds a ready-to-query handler from configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use permtree_domain::{GrantCache, PermissionResolver, ResolverConfig};
use permtree_storage::{MemoryInventoryStore, StorageError};

use crate::config::AppConfig;
use crate::handlers::PermissionQueryHandler;

/// Handler over the in-memory store.
pub type StoreHandler = PermissionQueryHandler<
    MemoryInventoryStore,
    MemoryInventoryStore,
    MemoryInventoryStore,
    MemoryInventoryStore,
>;

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("no inventory snapshot given: pass --snapshot or set storage.snapshot_path")]
    MissingSnapshot,

    #[error("failed to load inventory: {0}")]
    Storage(#[from] StorageError),
}

/// Loads the inventory snapshot and wires store, cache and resolver.
///
/// `snapshot` takes precedence over `storage.snapshot_path`.
pub fn build_handler(
    config: &AppConfig,
    snapshot: Option<&Path>,
) -> Result<StoreHandler, BootstrapError> {
    let path: PathBuf = match (snapshot, config.storage.snapshot_path.as_deref()) {
        (Some(path), _) => path.to_path_buf(),
        (None, Some(path)) => PathBuf::from(path),
        (None, None) => return Err(BootstrapError::MissingSnapshot),
    };

    let store = Arc::new(MemoryInventoryStore::from_snapshot_path(&path)?);

    let mut resolver_config = ResolverConfig::default();
    if config.cache.enabled {
        let cache = GrantCache::new(config.cache.to_cache_config());
        resolver_config = resolver_config.with_cache(Arc::new(cache));
    }

    info!(
        snapshot = %path.display(),
        cache = config.cache.enabled,
        "inventory ready"
    );

    let resolver = PermissionResolver::from_store(store).with_config(resolver_config);
    Ok(PermissionQueryHandler::new(Arc::new(resolver)))
}
