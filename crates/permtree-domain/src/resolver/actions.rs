//! Action aggregation: per-asset union of system-user actions.

use tracing::{debug, instrument};

use crate::error::{DomainError, DomainResult};
use crate::model::{Actions, AssetId, Principal, UserGroupId};

use super::traits::{AssetReader, GrantReader, HierarchyReader, MembershipReader};
use super::types::{ActionMap, GrantSet};
use super::PermissionResolver;

impl<H, G, A, M> PermissionResolver<H, G, A, M>
where
    H: HierarchyReader + 'static,
    G: GrantReader + 'static,
    A: AssetReader + 'static,
    M: MembershipReader + 'static,
{
    /// Union of the actions every applicable record allows on `asset`,
    /// per system user.
    ///
    /// For users this includes records inherited from their groups. Grants
    /// are additive: a direct grant and a group grant on the same system
    /// user contribute the union of their actions.
    #[instrument(skip(self, principal, asset), fields(principal = %principal, asset = %asset))]
    pub async fn actions_for(&self, principal: &Principal, asset: &AssetId) -> DomainResult<ActionMap> {
        let grants = self.resolve_grants(principal).await?;
        self.actions_with_grants(&grants, asset).await
    }

    /// Actions a group's own records allow on `asset`, without any user
    /// inheritance.
    pub async fn actions_for_group(
        &self,
        group: &UserGroupId,
        asset: &AssetId,
    ) -> DomainResult<ActionMap> {
        self.actions_for(&Principal::Group(group.clone()), asset).await
    }

    /// Aggregates actions on `asset` over an already-resolved grant set.
    pub async fn actions_with_grants(
        &self,
        grants: &GrantSet,
        asset: &AssetId,
    ) -> DomainResult<ActionMap> {
        let asset = self
            .assets
            .asset_by_id(asset)
            .await?
            .ok_or_else(|| DomainError::not_found("asset", asset.as_str()))?;

        // One lookup for every node id referenced by any record.
        let node_ids = grants.node_ids();
        let nodes = if node_ids.is_empty() {
            Vec::new()
        } else {
            self.hierarchy.nodes_by_ids(&node_ids).await?
        };

        let mut actions = ActionMap::new();
        let mut covering = 0usize;
        for record in grants.records() {
            let covers = record.assets.contains(&asset.id)
                || nodes
                    .iter()
                    .filter(|node| record.nodes.contains(&node.id))
                    .any(|node| asset.is_under(&node.key));
            if !covers {
                continue;
            }
            covering += 1;
            for (system_user, allowed) in &record.system_users {
                *actions
                    .entry(system_user.clone())
                    .or_insert(Actions::empty()) |= *allowed;
            }
        }

        debug!(
            covering,
            system_users = actions.len(),
            "aggregated actions"
        );
        Ok(actions)
    }
}
