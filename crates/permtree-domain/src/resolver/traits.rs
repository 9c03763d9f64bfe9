//! Collaborator traits consumed by the resolver.
//!
//! Each trait is a read-only view over data owned elsewhere (inventory
//! management, the administration layer, the directory). Implementations
//! must answer from a consistent snapshot for the duration of a call.

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::error::DomainResult;
use crate::model::{
    Application, ApplicationId, ApplicationPermission, Asset, AssetId, Node, NodeId, PathKey,
    PermissionRecord, Principal, UserGroupId, UserId,
};

/// Read access to the node hierarchy.
#[async_trait]
pub trait HierarchyReader: Send + Sync {
    /// Looks up a node by key.
    async fn node_by_key(&self, key: &PathKey) -> DomainResult<Option<Node>>;

    /// Returns the direct children of `parent_key`.
    async fn children_of(&self, parent_key: &PathKey) -> DomainResult<Vec<Node>>;

    /// Returns every strict descendant of `prefix`.
    async fn nodes_by_key_prefix(&self, prefix: &PathKey) -> DomainResult<Vec<Node>>;

    /// Returns the nodes whose key is in `keys`. Unknown keys are skipped.
    async fn nodes_by_keys(&self, keys: &BTreeSet<PathKey>) -> DomainResult<Vec<Node>>;

    /// Returns the nodes whose id is in `ids`. Unknown ids are skipped.
    async fn nodes_by_ids(&self, ids: &BTreeSet<NodeId>) -> DomainResult<Vec<Node>>;
}

/// Read access to permission records.
#[async_trait]
pub trait GrantReader: Send + Sync {
    /// Records naming `principal` directly, valid or not.
    ///
    /// Group inheritance is resolved by the caller.
    async fn records_for_principal(
        &self,
        principal: &Principal,
    ) -> DomainResult<Vec<PermissionRecord>>;

    /// Application records naming `principal` directly, valid or not.
    ///
    /// Default implementation returns an empty list.
    async fn application_records_for_principal(
        &self,
        _principal: &Principal,
    ) -> DomainResult<Vec<ApplicationPermission>> {
        Ok(Vec::new())
    }

    /// Monotonic version of the grant store, bumped on every record change.
    ///
    /// Used to key cached grant sets. Stores that cannot track changes keep
    /// the default and should not be paired with a cache.
    async fn version(&self) -> DomainResult<u64> {
        Ok(0)
    }
}

/// Read access to assets and applications.
#[async_trait]
pub trait AssetReader: Send + Sync {
    /// Assets with a membership in any of `keys` (exact key match).
    async fn assets_by_node_membership(&self, keys: &BTreeSet<PathKey>) -> DomainResult<Vec<Asset>>;

    /// Looks up an asset by id.
    async fn asset_by_id(&self, id: &AssetId) -> DomainResult<Option<Asset>>;

    /// Returns the assets whose id is in `ids`. Unknown ids are skipped.
    async fn assets_by_ids(&self, ids: &BTreeSet<AssetId>) -> DomainResult<Vec<Asset>>;

    /// Returns the applications whose id is in `ids`. Unknown ids are skipped.
    ///
    /// Default implementation returns an empty list.
    async fn applications_by_ids(
        &self,
        _ids: &BTreeSet<ApplicationId>,
    ) -> DomainResult<Vec<Application>> {
        Ok(Vec::new())
    }
}

/// Read access to user/group membership.
#[async_trait]
pub trait MembershipReader: Send + Sync {
    /// Groups `user` belongs to. Fails with `NotFound` for unknown users.
    async fn groups_of(&self, user: &UserId) -> DomainResult<BTreeSet<UserGroupId>>;

    /// Checks if a group exists.
    async fn group_exists(&self, group: &UserGroupId) -> DomainResult<bool>;
}
