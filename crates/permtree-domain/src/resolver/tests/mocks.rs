//! Mock collaborators for resolver testing.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{DomainError, DomainResult};
use crate::model::{
    Application, ApplicationId, ApplicationPermission, Asset, AssetId, Node, NodeId, PathKey,
    PermissionRecord, Principal, UserGroupId, UserId,
};
use crate::resolver::{
    AssetReader, GrantReader, HierarchyReader, MembershipReader, PermissionResolver,
};

pub type MockResolver = PermissionResolver<MockInventory, MockInventory, MockInventory, MockInventory>;

pub fn key(s: &str) -> PathKey {
    PathKey::parse(s).unwrap()
}

/// Mock inventory implementing every collaborator trait.
#[derive(Default)]
pub struct MockInventory {
    nodes: RwLock<BTreeMap<PathKey, Node>>,
    assets: RwLock<BTreeMap<AssetId, Asset>>,
    users: RwLock<BTreeMap<UserId, BTreeSet<UserGroupId>>>,
    groups: RwLock<BTreeSet<UserGroupId>>,
    records: RwLock<Vec<PermissionRecord>>,
    application_records: RwLock<Vec<ApplicationPermission>>,
    applications: RwLock<BTreeMap<ApplicationId, Application>>,
    version: AtomicU64,
    queries: AtomicUsize,
}

impl MockInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node whose id is `n` followed by the key with `:` replaced by `-`.
    pub async fn add_node(&self, key_str: &str) -> NodeId {
        let id = NodeId::new(format!("n{}", key_str.replace(':', "-")));
        let node = Node::new(id.clone(), key(key_str), format!("node {key_str}"));
        self.nodes.write().await.insert(node.key.clone(), node);
        id
    }

    pub async fn add_asset(&self, id: &str, memberships: &[&str]) {
        let mut asset = Asset::new(id, format!("{id}.example"));
        for m in memberships {
            asset = asset.in_node(key(m));
        }
        self.assets.write().await.insert(asset.id.clone(), asset);
    }

    pub async fn add_user(&self, user: &str, groups: &[&str]) {
        let groups = groups.iter().map(|g| UserGroupId::new(*g)).collect();
        self.users.write().await.insert(UserId::new(user), groups);
    }

    pub async fn add_group(&self, group: &str) {
        self.groups.write().await.insert(UserGroupId::new(group));
    }

    pub async fn add_record(&self, record: PermissionRecord) {
        self.records.write().await.push(record);
        self.version.fetch_add(1, Ordering::SeqCst);
    }

    pub async fn add_application_record(&self, record: ApplicationPermission) {
        self.application_records.write().await.push(record);
        self.version.fetch_add(1, Ordering::SeqCst);
    }

    pub async fn add_application(&self, id: &str, name: &str) {
        let application = Application {
            id: ApplicationId::new(id),
            name: name.to_string(),
            category: "db".to_string(),
        };
        self.applications
            .write()
            .await
            .insert(application.id.clone(), application);
    }

    /// Number of collaborator queries served so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn count(&self) {
        self.queries.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl HierarchyReader for MockInventory {
    async fn node_by_key(&self, key: &PathKey) -> DomainResult<Option<Node>> {
        self.count();
        Ok(self.nodes.read().await.get(key).cloned())
    }

    async fn children_of(&self, parent_key: &PathKey) -> DomainResult<Vec<Node>> {
        self.count();
        Ok(self
            .nodes
            .read()
            .await
            .values()
            .filter(|n| n.parent_key().as_ref() == Some(parent_key))
            .cloned()
            .collect())
    }

    async fn nodes_by_key_prefix(&self, prefix: &PathKey) -> DomainResult<Vec<Node>> {
        self.count();
        Ok(self
            .nodes
            .read()
            .await
            .values()
            .filter(|n| n.key.is_descendant_of(prefix))
            .cloned()
            .collect())
    }

    async fn nodes_by_keys(&self, keys: &BTreeSet<PathKey>) -> DomainResult<Vec<Node>> {
        self.count();
        let nodes = self.nodes.read().await;
        Ok(keys.iter().filter_map(|k| nodes.get(k).cloned()).collect())
    }

    async fn nodes_by_ids(&self, ids: &BTreeSet<NodeId>) -> DomainResult<Vec<Node>> {
        self.count();
        Ok(self
            .nodes
            .read()
            .await
            .values()
            .filter(|n| ids.contains(&n.id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl GrantReader for MockInventory {
    async fn records_for_principal(
        &self,
        principal: &Principal,
    ) -> DomainResult<Vec<PermissionRecord>> {
        self.count();
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|r| r.names_principal(principal))
            .cloned()
            .collect())
    }

    async fn application_records_for_principal(
        &self,
        principal: &Principal,
    ) -> DomainResult<Vec<ApplicationPermission>> {
        self.count();
        Ok(self
            .application_records
            .read()
            .await
            .iter()
            .filter(|r| r.names_principal(principal))
            .cloned()
            .collect())
    }

    async fn version(&self) -> DomainResult<u64> {
        Ok(self.version.load(Ordering::SeqCst))
    }
}

#[async_trait]
impl AssetReader for MockInventory {
    async fn assets_by_node_membership(&self, keys: &BTreeSet<PathKey>) -> DomainResult<Vec<Asset>> {
        self.count();
        Ok(self
            .assets
            .read()
            .await
            .values()
            .filter(|a| a.nodes.iter().any(|m| keys.contains(m)))
            .cloned()
            .collect())
    }

    async fn asset_by_id(&self, id: &AssetId) -> DomainResult<Option<Asset>> {
        self.count();
        Ok(self.assets.read().await.get(id).cloned())
    }

    async fn assets_by_ids(&self, ids: &BTreeSet<AssetId>) -> DomainResult<Vec<Asset>> {
        self.count();
        let assets = self.assets.read().await;
        Ok(ids.iter().filter_map(|id| assets.get(id).cloned()).collect())
    }

    async fn applications_by_ids(
        &self,
        ids: &BTreeSet<ApplicationId>,
    ) -> DomainResult<Vec<Application>> {
        self.count();
        let applications = self.applications.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| applications.get(id).cloned())
            .collect())
    }
}

#[async_trait]
impl MembershipReader for MockInventory {
    async fn groups_of(&self, user: &UserId) -> DomainResult<BTreeSet<UserGroupId>> {
        self.count();
        self.users
            .read()
            .await
            .get(user)
            .cloned()
            .ok_or_else(|| DomainError::not_found("user", user.as_str()))
    }

    async fn group_exists(&self, group: &UserGroupId) -> DomainResult<bool> {
        self.count();
        Ok(self.groups.read().await.contains(group))
    }
}

/// Builds the hierarchy used by most tests:
///
/// ```text
/// 1 ─ 1:2 ─ 1:2:3
///   └ 1:4
/// 2 ─ 2:5 ─ 2:5:9 ─ 2:5:9:1
///   │     └ 2:5:10
///   └ 2:6
/// 12
/// ```
///
/// with user `alice` in group `ops`, user `bob` in no group, and group
/// `dev` without members.
pub async fn fixture() -> Arc<MockInventory> {
    let inventory = Arc::new(MockInventory::new());
    for k in [
        "1", "1:2", "1:2:3", "1:4", "2", "2:5", "2:5:9", "2:5:9:1", "2:5:10", "2:6", "12",
    ] {
        inventory.add_node(k).await;
    }
    inventory.add_group("ops").await;
    inventory.add_group("dev").await;
    inventory.add_user("alice", &["ops"]).await;
    inventory.add_user("bob", &[]).await;
    inventory
}

pub fn node_id(key_str: &str) -> NodeId {
    NodeId::new(format!("n{}", key_str.replace(':', "-")))
}

pub fn resolver(inventory: &Arc<MockInventory>) -> MockResolver {
    PermissionResolver::from_store(Arc::clone(inventory))
}

pub fn asset_ids(assets: &[Asset]) -> Vec<&str> {
    assets.iter().map(|a| a.id.as_str()).collect()
}

pub fn node_keys(nodes: &[Node]) -> Vec<&str> {
    nodes.iter().map(|n| n.key.as_str()).collect()
}
