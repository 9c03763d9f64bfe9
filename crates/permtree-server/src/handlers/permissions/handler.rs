//! Permission query handler implementation.

use std::sync::Arc;

use tracing::{debug, instrument};

use permtree_domain::model::{Application, Asset, AssetId, NodeId, PathKey, Principal};
use permtree_domain::resolver::{AssetReader, GrantReader, HierarchyReader, MembershipReader};
use permtree_domain::PermissionResolver;

use super::types::{AssetSystemUser, HandlerError, HandlerResult, TreeNode};

/// Handler for principal-scoped inventory queries.
///
/// Principals are given as `user:<id>` or `group:<id>`.
pub struct PermissionQueryHandler<H, G, A, M> {
    resolver: Arc<PermissionResolver<H, G, A, M>>,
}

impl<H, G, A, M> PermissionQueryHandler<H, G, A, M>
where
    H: HierarchyReader + 'static,
    G: GrantReader + 'static,
    A: AssetReader + 'static,
    M: MembershipReader + 'static,
{
    pub fn new(resolver: Arc<PermissionResolver<H, G, A, M>>) -> Self {
        Self { resolver }
    }

    /// Every asset the principal can reach, sorted by id.
    #[instrument(skip(self))]
    pub async fn granted_assets(&self, principal: &str) -> HandlerResult<Vec<Asset>> {
        let principal = parse_principal(principal)?;
        Ok(self.resolver.granted_assets_for(&principal).await?)
    }

    /// Granted nodes and touch points as tree nodes, sorted by key.
    #[instrument(skip(self))]
    pub async fn granted_nodes(&self, principal: &str) -> HandlerResult<Vec<TreeNode>> {
        let principal = parse_principal(principal)?;
        let nodes = self.resolver.granted_nodes_for(&principal).await?;
        Ok(nodes.all().iter().map(TreeNode::from_node).collect())
    }

    /// Granted assets inside the subtree of the node with id `node_id`.
    #[instrument(skip(self))]
    pub async fn node_assets(&self, principal: &str, node_id: &str) -> HandlerResult<Vec<Asset>> {
        let principal = parse_principal(principal)?;
        let grants = self.resolver.resolve_grants(&principal).await?;
        Ok(self
            .resolver
            .granted_assets_under_node_id(&grants, &NodeId::new(node_id))
            .await?)
    }

    /// Visible children of the node at `key`, or the visible roots when
    /// `key` is `None`.
    #[instrument(skip(self))]
    pub async fn node_children(
        &self,
        principal: &str,
        key: Option<&str>,
    ) -> HandlerResult<Vec<TreeNode>> {
        let principal = parse_principal(principal)?;
        let position = key.map(parse_key).transpose()?;
        let children = self
            .resolver
            .visible_children(&principal, position.as_ref())
            .await?;
        debug!(children = children.len(), "expanded tree position");
        Ok(children.iter().map(TreeNode::from_node).collect())
    }

    /// System users the principal may use on `asset_id`, with the granted
    /// action names. System users without any action are omitted.
    #[instrument(skip(self))]
    pub async fn asset_system_users(
        &self,
        principal: &str,
        asset_id: &str,
    ) -> HandlerResult<Vec<AssetSystemUser>> {
        let principal = parse_principal(principal)?;
        let actions = self
            .resolver
            .actions_for(&principal, &AssetId::new(asset_id))
            .await?;
        Ok(actions
            .into_iter()
            .filter(|(_, actions)| !actions.is_empty())
            .map(|(system_user, actions)| AssetSystemUser::new(system_user, actions))
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn granted_applications(&self, principal: &str) -> HandlerResult<Vec<Application>> {
        let principal = parse_principal(principal)?;
        Ok(self.resolver.granted_applications(&principal).await?)
    }
}

fn parse_principal(value: &str) -> HandlerResult<Principal> {
    Ok(Principal::parse(value)?)
}

fn parse_key(value: &str) -> HandlerResult<PathKey> {
    PathKey::parse(value).map_err(|e| HandlerError::InvalidRequest {
        message: e.to_string(),
    })
}
