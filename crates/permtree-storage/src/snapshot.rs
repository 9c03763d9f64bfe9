//! JSON inventory snapshots.
//!
//! A snapshot is the whole inventory in one document: hierarchy, assets,
//! directory and grants. Loading goes through the validated write paths
//! of [`MemoryInventoryStore`], so a snapshot with dangling references is
//! rejected instead of half-loaded into a usable store.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use permtree_domain::model::{
    Application, ApplicationPermission, Asset, Node, PermissionRecord, UserGroupId, UserId,
};

use crate::error::{StorageError, StorageResult};
use crate::memory::MemoryInventoryStore;

/// A user and the groups it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEntry {
    pub id: UserId,
    #[serde(default)]
    pub groups: BTreeSet<UserGroupId>,
}

/// Serialized form of an inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub groups: Vec<UserGroupId>,
    #[serde(default)]
    pub users: Vec<UserEntry>,
    #[serde(default)]
    pub permissions: Vec<PermissionRecord>,
    #[serde(default)]
    pub application_permissions: Vec<ApplicationPermission>,
    #[serde(default)]
    pub applications: Vec<Application>,
}

impl InventorySnapshot {
    pub fn from_json(json: &str) -> StorageResult<Self> {
        serde_json::from_str(json).map_err(|e| StorageError::SerializationError {
            message: e.to_string(),
        })
    }

    /// Reads a snapshot file.
    pub fn from_path(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| StorageError::IoError {
            message: format!("failed to read '{}': {e}", path.display()),
        })?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> StorageResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| StorageError::SerializationError {
            message: e.to_string(),
        })
    }
}

impl MemoryInventoryStore {
    /// Builds a store from a snapshot.
    ///
    /// Nodes are inserted parents first regardless of their order in the
    /// document.
    #[instrument(skip(snapshot), fields(nodes = snapshot.nodes.len(), assets = snapshot.assets.len()))]
    pub fn from_snapshot(snapshot: InventorySnapshot) -> StorageResult<Self> {
        let store = Self::new();

        let mut nodes = snapshot.nodes;
        nodes.sort_by(|a, b| {
            a.key
                .depth()
                .cmp(&b.key.depth())
                .then_with(|| a.key.cmp(&b.key))
        });
        for node in nodes {
            store.insert_node(node)?;
        }
        for asset in snapshot.assets {
            store.upsert_asset(asset)?;
        }
        for application in snapshot.applications {
            store.upsert_application(application);
        }
        for group in snapshot.groups {
            store.insert_group(group)?;
        }
        for user in snapshot.users {
            store.insert_user(user.id, user.groups)?;
        }
        for record in snapshot.permissions {
            store.upsert_record(record)?;
        }
        for record in snapshot.application_permissions {
            store.upsert_application_record(record)?;
        }

        info!(version = store.current_version(), "inventory loaded");
        Ok(store)
    }

    /// Loads a store straight from a snapshot file.
    pub fn from_snapshot_path(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "reading inventory snapshot");
        Self::from_snapshot(InventorySnapshot::from_path(path)?)
    }

    /// Captures the current contents, sorted for stable output.
    pub fn snapshot(&self) -> InventorySnapshot {
        InventorySnapshot {
            nodes: self.all_nodes(),
            assets: self.all_assets(),
            groups: self.all_groups(),
            users: self
                .all_users()
                .into_iter()
                .map(|(id, groups)| UserEntry { id, groups })
                .collect(),
            permissions: self.all_records(),
            application_permissions: self.all_application_records(),
            applications: self.all_applications(),
        }
    }
}
