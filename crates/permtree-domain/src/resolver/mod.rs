//! Hierarchical grant resolution.
//!
//! The resolver turns a principal (and optionally a tree position) into
//! views over the inventory:
//!
//! - **Grant index** (`grant_index.rs`): currently-valid records of a user
//!   or group, including one level of group inheritance for users.
//! - **Assets** (`assets.rs`): directly granted assets plus every asset
//!   inside a granted subtree.
//! - **Nodes** (`nodes.rs`): whole-subtree grants and touch points.
//! - **Tree** (`tree.rs`): lazily-expanded visible children.
//! - **Actions** (`actions.rs`): per-asset union of system-user actions.
//! - **Applications** (`applications.rs`): applications granted through
//!   application records.
//!
//! # Architecture Decisions
//!
//! - **Snapshot queries**: every operation issues a bounded number of
//!   collaborator queries and does containment work in memory. Nothing is
//!   fetched per tree node.
//! - **Strict prefixes**: subtree tests go through
//!   [`PathKey::is_descendant_of`](crate::model::PathKey::is_descendant_of),
//!   which always compares against `key + ":"`.
//! - **Additive grants**: overlapping records only ever widen access.

mod actions;
mod applications;
mod assets;
mod config;
mod grant_index;
mod nodes;
mod traits;
mod tree;
mod types;

#[cfg(test)]
mod tests;

use std::sync::Arc;

pub use config::ResolverConfig;
pub use traits::{AssetReader, GrantReader, HierarchyReader, MembershipReader};
pub use types::{ActionMap, GrantSet, GrantedNodeSet};

/// Resolves grants against the hierarchy.
///
/// Holds one handle per collaborator; all operations are read-only and can
/// run concurrently from shared references.
pub struct PermissionResolver<H, G, A, M> {
    hierarchy: Arc<H>,
    grants: Arc<G>,
    assets: Arc<A>,
    membership: Arc<M>,
    config: ResolverConfig,
}

impl<H, G, A, M> PermissionResolver<H, G, A, M>
where
    H: HierarchyReader + 'static,
    G: GrantReader + 'static,
    A: AssetReader + 'static,
    M: MembershipReader + 'static,
{
    /// Creates a new resolver with default configuration.
    pub fn new(hierarchy: Arc<H>, grants: Arc<G>, assets: Arc<A>, membership: Arc<M>) -> Self {
        Self {
            hierarchy,
            grants,
            assets,
            membership,
            config: ResolverConfig::default(),
        }
    }

    /// Replaces the resolver configuration.
    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }
}

impl<S> PermissionResolver<S, S, S, S>
where
    S: HierarchyReader + GrantReader + AssetReader + MembershipReader + 'static,
{
    /// Creates a resolver over a single store implementing every
    /// collaborator trait.
    pub fn from_store(store: Arc<S>) -> Self {
        Self::new(
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&store),
            store,
        )
    }
}
