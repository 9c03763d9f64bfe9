//! Tree expansion: visible children of a position for a principal.
//!
//! A UI walks the hierarchy top-down. At each position the principal sees
//! either the real children (inside a granted subtree) or one pass-through
//! entry per branch that leads toward a deeper grant or touch point.
//! Branches without anything granted beneath them stay hidden.

use std::collections::BTreeSet;

use tracing::{debug, instrument};

use crate::error::{DomainError, DomainResult};
use crate::model::{Node, PathKey, Principal};

use super::traits::{AssetReader, GrantReader, HierarchyReader, MembershipReader};
use super::types::GrantedNodeSet;
use super::PermissionResolver;

impl<H, G, A, M> PermissionResolver<H, G, A, M>
where
    H: HierarchyReader + 'static,
    G: GrantReader + 'static,
    A: AssetReader + 'static,
    M: MembershipReader + 'static,
{
    /// Visible children of `position` (or the visible roots for `None`),
    /// sorted by key.
    ///
    /// Fails with `NotFound` when `position` names no node.
    #[instrument(skip(self, principal, position), fields(principal = %principal, position = ?position.map(PathKey::as_str)))]
    pub async fn visible_children(
        &self,
        principal: &Principal,
        position: Option<&PathKey>,
    ) -> DomainResult<Vec<Node>> {
        if let Some(key) = position {
            if self.hierarchy.node_by_key(key).await?.is_none() {
                return Err(DomainError::not_found("node", key.as_str()));
            }
        }

        let grants = self.resolve_grants(principal).await?;
        let nodes = self.granted_nodes(&grants).await?;
        self.expand(&nodes, position).await
    }

    /// Expansion step over an already-resolved node set.
    pub async fn expand(
        &self,
        nodes: &GrantedNodeSet,
        position: Option<&PathKey>,
    ) -> DomainResult<Vec<Node>> {
        let keys = match position {
            None => root_keys(nodes),
            Some(key) if nodes.is_fully_granted(key) => {
                let mut children = self.hierarchy.children_of(key).await?;
                children.sort_by(|a, b| a.key.cmp(&b.key));
                debug!(children = children.len(), "position is granted, returning real children");
                return Ok(children);
            }
            Some(key) => pass_through_keys(nodes, key),
        };

        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let mut visible = self.hierarchy.nodes_by_keys(&keys).await?;
        visible.sort_by(|a, b| a.key.cmp(&b.key));
        debug!(visible = visible.len(), "expanded position");
        Ok(visible)
    }
}

/// Outermost ancestor of every granted or touched key.
fn root_keys(nodes: &GrantedNodeSet) -> BTreeSet<PathKey> {
    nodes.all_keys().into_iter().map(PathKey::root_key).collect()
}

/// One key per child of `position` that lies on a path toward a granted or
/// touched key strictly below `position`.
fn pass_through_keys(nodes: &GrantedNodeSet, position: &PathKey) -> BTreeSet<PathKey> {
    nodes
        .all_keys()
        .into_iter()
        .filter_map(|key| key.next_segment_after(position))
        .collect()
}
