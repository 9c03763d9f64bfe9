//! Node resolution: grant set -> granted nodes and touch points.

use std::collections::BTreeSet;

use tracing::{debug, instrument};

use crate::error::DomainResult;
use crate::model::{PathKey, Principal};

use super::traits::{AssetReader, GrantReader, HierarchyReader, MembershipReader};
use super::types::{GrantSet, GrantedNodeSet};
use super::PermissionResolver;

impl<H, G, A, M> PermissionResolver<H, G, A, M>
where
    H: HierarchyReader + 'static,
    G: GrantReader + 'static,
    A: AssetReader + 'static,
    M: MembershipReader + 'static,
{
    /// Nodes named by `grants` (whole-subtree grants) and nodes holding a
    /// directly-granted asset (touch points).
    #[instrument(skip(self, grants), fields(records = grants.len()))]
    pub async fn granted_nodes(&self, grants: &GrantSet) -> DomainResult<GrantedNodeSet> {
        let mut nodes = GrantedNodeSet::default();

        let node_ids = grants.node_ids();
        if !node_ids.is_empty() {
            for node in self.hierarchy.nodes_by_ids(&node_ids).await? {
                nodes.granted.insert(node.key.clone(), node);
            }
        }

        let asset_ids = grants.asset_ids();
        if !asset_ids.is_empty() {
            let touch_keys: BTreeSet<PathKey> = self
                .assets
                .assets_by_ids(&asset_ids)
                .await?
                .into_iter()
                .flat_map(|asset| asset.nodes)
                .collect();
            if !touch_keys.is_empty() {
                for node in self.hierarchy.nodes_by_keys(&touch_keys).await? {
                    nodes.touched.insert(node.key.clone(), node);
                }
            }
        }

        debug!(
            granted = nodes.granted.len(),
            touched = nodes.touched.len(),
            "resolved granted nodes"
        );
        Ok(nodes)
    }

    /// Convenience form of [`Self::granted_nodes`] starting from a principal.
    pub async fn granted_nodes_for(&self, principal: &Principal) -> DomainResult<GrantedNodeSet> {
        let grants = self.resolve_grants(principal).await?;
        self.granted_nodes(&grants).await
    }
}
