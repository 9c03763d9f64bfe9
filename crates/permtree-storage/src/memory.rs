//! In-memory inventory store.
//!
//! # Performance Characteristics
//!
//! - **Key / id lookups**: O(1) average (DashMap lookup)
//! - **Prefix and membership queries**: O(N) linear scan over nodes or assets
//! - **Writes**: O(1) plus validation of referenced entities
//!
//! Every write that touches permission records bumps the grant-store
//! version, so grant caches keyed on it never serve stale record sets.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use tracing::{debug, instrument};

use permtree_domain::model::{
    Application, ApplicationId, ApplicationPermission, Asset, AssetId, Node, NodeId, PathKey,
    PermissionId, PermissionRecord, Principal, UserGroupId, UserId,
};
use permtree_domain::resolver::{AssetReader, GrantReader, HierarchyReader, MembershipReader};
use permtree_domain::{DomainError, DomainResult};

use crate::error::{StorageError, StorageResult};

/// In-memory implementation of every resolver collaborator.
///
/// Uses DashMap for thread-safe concurrent access; readers never block
/// each other.
#[derive(Debug, Default)]
pub struct MemoryInventoryStore {
    nodes: DashMap<PathKey, Node>,
    /// Node id -> key, for resolving record node grants.
    node_keys: DashMap<NodeId, PathKey>,
    assets: DashMap<AssetId, Asset>,
    users: DashMap<UserId, BTreeSet<UserGroupId>>,
    groups: DashSet<UserGroupId>,
    records: DashMap<PermissionId, PermissionRecord>,
    application_records: DashMap<PermissionId, ApplicationPermission>,
    applications: DashMap<ApplicationId, Application>,
    version: AtomicU64,
}

impl MemoryInventoryStore {
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new store wrapped in Arc.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Current grant-store version.
    pub fn current_version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    fn bump_version(&self) {
        self.version.fetch_add(1, Ordering::SeqCst);
    }

    // Hierarchy

    /// Inserts a node. Its parent must already exist.
    pub fn insert_node(&self, node: Node) -> StorageResult<()> {
        if let Some(parent) = node.parent_key() {
            if !self.nodes.contains_key(&parent) {
                return Err(StorageError::invalid(format!(
                    "parent '{parent}' of node '{}' does not exist",
                    node.key
                )));
            }
        }

        // Id slot first, then key slot; both stay locked until the insert.
        use dashmap::mapref::entry::Entry;
        let id_slot = match self.node_keys.entry(node.id.clone()) {
            Entry::Occupied(_) => return Err(StorageError::already_exists("node", &node.id)),
            Entry::Vacant(slot) => slot,
        };
        match self.nodes.entry(node.key.clone()) {
            Entry::Occupied(_) => Err(StorageError::already_exists("node key", &node.key)),
            Entry::Vacant(key_slot) => {
                id_slot.insert(node.key.clone());
                key_slot.insert(node);
                Ok(())
            }
        }
    }

    // Assets and applications

    /// Inserts or replaces an asset. Every membership must name an
    /// existing node.
    pub fn upsert_asset(&self, asset: Asset) -> StorageResult<()> {
        if let Some(missing) = asset.nodes.iter().find(|k| !self.nodes.contains_key(*k)) {
            return Err(StorageError::invalid(format!(
                "asset '{}' is a member of unknown node '{missing}'",
                asset.id
            )));
        }
        self.assets.insert(asset.id.clone(), asset);
        Ok(())
    }

    pub fn upsert_application(&self, application: Application) {
        self.applications.insert(application.id.clone(), application);
    }

    // Directory

    pub fn insert_group(&self, group: UserGroupId) -> StorageResult<()> {
        if !self.groups.insert(group.clone()) {
            return Err(StorageError::already_exists("user group", &group));
        }
        Ok(())
    }

    /// Inserts a user together with the groups it belongs to.
    pub fn insert_user(&self, user: UserId, groups: BTreeSet<UserGroupId>) -> StorageResult<()> {
        if let Some(missing) = groups.iter().find(|g| !self.groups.contains(*g)) {
            return Err(StorageError::not_found("user group", missing));
        }
        use dashmap::mapref::entry::Entry;
        match self.users.entry(user.clone()) {
            Entry::Occupied(_) => Err(StorageError::already_exists("user", &user)),
            Entry::Vacant(entry) => {
                entry.insert(groups);
                Ok(())
            }
        }
    }

    /// Adds `member` to `group`. Only users can be group members.
    pub fn add_group_member(&self, group: &UserGroupId, member: &Principal) -> StorageResult<()> {
        if !self.groups.contains(group) {
            return Err(StorageError::not_found("user group", group));
        }
        let user = match member {
            Principal::User(user) => user,
            Principal::Group(_) => {
                return Err(StorageError::InvalidPrincipal {
                    value: member.to_string(),
                    reason: "groups cannot be members of other groups".to_string(),
                })
            }
        };
        let mut groups = self
            .users
            .get_mut(user)
            .ok_or_else(|| StorageError::not_found("user", user))?;
        groups.insert(group.clone());
        drop(groups);
        self.bump_version();
        Ok(())
    }

    // Grants

    /// Inserts or replaces a permission record after checking every
    /// reference it holds.
    pub fn upsert_record(&self, record: PermissionRecord) -> StorageResult<()> {
        self.check_principals(&record.users, &record.user_groups)?;
        if let Some(missing) = record.nodes.iter().find(|n| !self.node_keys.contains_key(*n)) {
            return Err(StorageError::invalid(format!(
                "permission '{}' grants unknown node '{missing}'",
                record.id
            )));
        }
        if let Some(missing) = record.assets.iter().find(|a| !self.assets.contains_key(*a)) {
            return Err(StorageError::invalid(format!(
                "permission '{}' grants unknown asset '{missing}'",
                record.id
            )));
        }
        self.records.insert(record.id.clone(), record);
        self.bump_version();
        Ok(())
    }

    /// Flips the validity flag of a record.
    pub fn set_record_validity(&self, id: &PermissionId, valid: bool) -> StorageResult<()> {
        let mut record = self
            .records
            .get_mut(id)
            .ok_or_else(|| StorageError::not_found("permission", id))?;
        record.valid = valid;
        drop(record);
        self.bump_version();
        Ok(())
    }

    pub fn remove_record(&self, id: &PermissionId) -> StorageResult<PermissionRecord> {
        let (_, record) = self
            .records
            .remove(id)
            .ok_or_else(|| StorageError::not_found("permission", id))?;
        self.bump_version();
        Ok(record)
    }

    pub fn upsert_application_record(&self, record: ApplicationPermission) -> StorageResult<()> {
        self.check_principals(&record.users, &record.user_groups)?;
        if let Some(missing) = record
            .applications
            .iter()
            .find(|a| !self.applications.contains_key(*a))
        {
            return Err(StorageError::invalid(format!(
                "application permission '{}' grants unknown application '{missing}'",
                record.id
            )));
        }
        self.application_records.insert(record.id.clone(), record);
        self.bump_version();
        Ok(())
    }

    fn check_principals(
        &self,
        users: &BTreeSet<UserId>,
        groups: &BTreeSet<UserGroupId>,
    ) -> StorageResult<()> {
        if let Some(missing) = users.iter().find(|u| !self.users.contains_key(*u)) {
            return Err(StorageError::not_found("user", missing));
        }
        if let Some(missing) = groups.iter().find(|g| !self.groups.contains(*g)) {
            return Err(StorageError::not_found("user group", missing));
        }
        Ok(())
    }

    // Bulk access for snapshots

    pub(crate) fn all_nodes(&self) -> Vec<Node> {
        let mut nodes: Vec<Node> = self.nodes.iter().map(|n| n.value().clone()).collect();
        nodes.sort_by(|a, b| a.key.cmp(&b.key));
        nodes
    }

    pub(crate) fn all_assets(&self) -> Vec<Asset> {
        let mut assets: Vec<Asset> = self.assets.iter().map(|a| a.value().clone()).collect();
        assets.sort_by(|a, b| a.id.cmp(&b.id));
        assets
    }

    pub(crate) fn all_users(&self) -> Vec<(UserId, BTreeSet<UserGroupId>)> {
        let mut users: Vec<_> = self
            .users
            .iter()
            .map(|u| (u.key().clone(), u.value().clone()))
            .collect();
        users.sort_by(|a, b| a.0.cmp(&b.0));
        users
    }

    pub(crate) fn all_groups(&self) -> Vec<UserGroupId> {
        let mut groups: Vec<UserGroupId> = self.groups.iter().map(|g| g.key().clone()).collect();
        groups.sort();
        groups
    }

    pub(crate) fn all_records(&self) -> Vec<PermissionRecord> {
        let mut records: Vec<_> = self.records.iter().map(|r| r.value().clone()).collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        records
    }

    pub(crate) fn all_application_records(&self) -> Vec<ApplicationPermission> {
        let mut records: Vec<_> = self
            .application_records
            .iter()
            .map(|r| r.value().clone())
            .collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        records
    }

    pub(crate) fn all_applications(&self) -> Vec<Application> {
        let mut applications: Vec<_> = self.applications.iter().map(|a| a.value().clone()).collect();
        applications.sort_by(|a, b| a.id.cmp(&b.id));
        applications
    }
}

#[async_trait]
impl HierarchyReader for MemoryInventoryStore {
    async fn node_by_key(&self, key: &PathKey) -> DomainResult<Option<Node>> {
        Ok(self.nodes.get(key).map(|n| n.value().clone()))
    }

    async fn children_of(&self, parent_key: &PathKey) -> DomainResult<Vec<Node>> {
        Ok(self
            .nodes
            .iter()
            .filter(|n| n.value().parent_key().as_ref() == Some(parent_key))
            .map(|n| n.value().clone())
            .collect())
    }

    #[instrument(skip(self, prefix), fields(prefix = %prefix))]
    async fn nodes_by_key_prefix(&self, prefix: &PathKey) -> DomainResult<Vec<Node>> {
        let nodes: Vec<Node> = self
            .nodes
            .iter()
            .filter(|n| n.key().is_descendant_of(prefix))
            .map(|n| n.value().clone())
            .collect();
        debug!(count = nodes.len(), "prefix scan");
        Ok(nodes)
    }

    async fn nodes_by_keys(&self, keys: &BTreeSet<PathKey>) -> DomainResult<Vec<Node>> {
        Ok(keys
            .iter()
            .filter_map(|k| self.nodes.get(k).map(|n| n.value().clone()))
            .collect())
    }

    async fn nodes_by_ids(&self, ids: &BTreeSet<NodeId>) -> DomainResult<Vec<Node>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.node_keys.get(id).map(|k| k.value().clone()))
            .filter_map(|key| self.nodes.get(&key).map(|n| n.value().clone()))
            .collect())
    }
}

#[async_trait]
impl GrantReader for MemoryInventoryStore {
    async fn records_for_principal(
        &self,
        principal: &Principal,
    ) -> DomainResult<Vec<PermissionRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.value().names_principal(principal))
            .map(|r| r.value().clone())
            .collect())
    }

    async fn application_records_for_principal(
        &self,
        principal: &Principal,
    ) -> DomainResult<Vec<ApplicationPermission>> {
        Ok(self
            .application_records
            .iter()
            .filter(|r| r.value().names_principal(principal))
            .map(|r| r.value().clone())
            .collect())
    }

    async fn version(&self) -> DomainResult<u64> {
        Ok(self.current_version())
    }
}

#[async_trait]
impl AssetReader for MemoryInventoryStore {
    #[instrument(skip(self, keys), fields(keys = keys.len()))]
    async fn assets_by_node_membership(&self, keys: &BTreeSet<PathKey>) -> DomainResult<Vec<Asset>> {
        let assets: Vec<Asset> = self
            .assets
            .iter()
            .filter(|a| a.value().nodes.iter().any(|m| keys.contains(m)))
            .map(|a| a.value().clone())
            .collect();
        debug!(count = assets.len(), "membership scan");
        Ok(assets)
    }

    async fn asset_by_id(&self, id: &AssetId) -> DomainResult<Option<Asset>> {
        Ok(self.assets.get(id).map(|a| a.value().clone()))
    }

    async fn assets_by_ids(&self, ids: &BTreeSet<AssetId>) -> DomainResult<Vec<Asset>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.assets.get(id).map(|a| a.value().clone()))
            .collect())
    }

    async fn applications_by_ids(
        &self,
        ids: &BTreeSet<ApplicationId>,
    ) -> DomainResult<Vec<Application>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.applications.get(id).map(|a| a.value().clone()))
            .collect())
    }
}

#[async_trait]
impl MembershipReader for MemoryInventoryStore {
    async fn groups_of(&self, user: &UserId) -> DomainResult<BTreeSet<UserGroupId>> {
        self.users
            .get(user)
            .map(|g| g.value().clone())
            .ok_or_else(|| DomainError::not_found("user", user.as_str()))
    }

    async fn group_exists(&self, group: &UserGroupId) -> DomainResult<bool> {
        Ok(self.groups.contains(group))
    }
}
