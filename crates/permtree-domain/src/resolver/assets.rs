//! Asset resolution: grant set -> reachable assets.

use std::collections::{BTreeMap, BTreeSet};

use futures::future::try_join_all;
use tracing::{debug, instrument};

use crate::error::{DomainError, DomainResult};
use crate::model::{minimal_cover, Asset, AssetId, NodeId, PathKey, Principal};

use super::traits::{AssetReader, GrantReader, HierarchyReader, MembershipReader};
use super::types::GrantSet;
use super::PermissionResolver;

impl<H, G, A, M> PermissionResolver<H, G, A, M>
where
    H: HierarchyReader + 'static,
    G: GrantReader + 'static,
    A: AssetReader + 'static,
    M: MembershipReader + 'static,
{
    /// Assets reachable through `grants`, sorted by id.
    ///
    /// An asset is reachable if a record lists it directly, or if it is a
    /// member of a granted node or of any descendant of one.
    #[instrument(skip(self, grants), fields(records = grants.len()))]
    pub async fn granted_assets(&self, grants: &GrantSet) -> DomainResult<Vec<Asset>> {
        let granted_keys = self.granted_node_keys(grants).await?;
        let mut assets = self.assets_in_subtrees(&granted_keys).await?;

        let direct_ids = grants.asset_ids();
        if !direct_ids.is_empty() {
            for asset in self.assets.assets_by_ids(&direct_ids).await? {
                assets.entry(asset.id.clone()).or_insert(asset);
            }
        }

        debug!(assets = assets.len(), "resolved granted assets");
        Ok(assets.into_values().collect())
    }

    /// Convenience form of [`Self::granted_assets`] starting from a principal.
    pub async fn granted_assets_for(&self, principal: &Principal) -> DomainResult<Vec<Asset>> {
        let grants = self.resolve_grants(principal).await?;
        self.granted_assets(&grants).await
    }

    /// Granted assets restricted to the subtree rooted at `node_key`.
    ///
    /// An asset qualifies through a membership at or below `node_key` that
    /// is itself covered by a granted node, or by being directly granted
    /// while having a membership in the subtree. Fails with `NotFound` when
    /// no node has `node_key`.
    #[instrument(skip(self, grants, node_key), fields(records = grants.len(), node = %node_key))]
    pub async fn granted_assets_under_node(
        &self,
        grants: &GrantSet,
        node_key: &PathKey,
    ) -> DomainResult<Vec<Asset>> {
        if self.hierarchy.node_by_key(node_key).await?.is_none() {
            return Err(DomainError::not_found("node", node_key.as_str()));
        }

        let granted_keys = self.granted_node_keys(grants).await?;

        // The node sits inside a granted subtree: everything below is visible.
        if granted_keys
            .iter()
            .any(|granted| node_key.is_self_or_descendant_of(granted))
        {
            let whole = BTreeSet::from([node_key.clone()]);
            let assets = self.assets_in_subtrees(&whole).await?;
            debug!(assets = assets.len(), "node is granted, returning whole subtree");
            return Ok(assets.into_values().collect());
        }

        let inner: BTreeSet<PathKey> = granted_keys
            .into_iter()
            .filter(|granted| granted.is_descendant_of(node_key))
            .collect();
        let mut assets = self.assets_in_subtrees(&inner).await?;

        let direct_ids = grants.asset_ids();
        if !direct_ids.is_empty() {
            for asset in self.assets.assets_by_ids(&direct_ids).await? {
                if asset.is_under(node_key) {
                    assets.entry(asset.id.clone()).or_insert(asset);
                }
            }
        }

        debug!(assets = assets.len(), "resolved granted assets under node");
        Ok(assets.into_values().collect())
    }

    /// [`Self::granted_assets_under_node`] addressed by node id.
    pub async fn granted_assets_under_node_id(
        &self,
        grants: &GrantSet,
        node_id: &NodeId,
    ) -> DomainResult<Vec<Asset>> {
        let node = self
            .hierarchy
            .nodes_by_ids(&BTreeSet::from([node_id.clone()]))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::not_found("node", node_id.as_str()))?;
        self.granted_assets_under_node(grants, &node.key).await
    }

    /// Keys of the nodes granted as whole subtrees.
    pub(crate) async fn granted_node_keys(&self, grants: &GrantSet) -> DomainResult<BTreeSet<PathKey>> {
        let node_ids = grants.node_ids();
        if node_ids.is_empty() {
            return Ok(BTreeSet::new());
        }
        Ok(self
            .hierarchy
            .nodes_by_ids(&node_ids)
            .await?
            .into_iter()
            .map(|node| node.key)
            .collect())
    }

    /// Every asset with a membership at or below any of `roots`.
    async fn assets_in_subtrees(
        &self,
        roots: &BTreeSet<PathKey>,
    ) -> DomainResult<BTreeMap<AssetId, Asset>> {
        let cover = minimal_cover(roots.iter());
        if cover.is_empty() {
            return Ok(BTreeMap::new());
        }

        let descendants = try_join_all(
            cover
                .iter()
                .map(|root| self.hierarchy.nodes_by_key_prefix(root)),
        )
        .await?;

        let mut keys = cover;
        keys.extend(descendants.into_iter().flatten().map(|node| node.key));

        Ok(self
            .assets
            .assets_by_node_membership(&keys)
            .await?
            .into_iter()
            .map(|asset| (asset.id.clone(), asset))
            .collect())
    }
}
