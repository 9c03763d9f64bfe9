//! Permission query handler.
//!
//! Wraps a [`PermissionResolver`](permtree_domain::PermissionResolver) and
//! exposes the user-facing queries: granted assets, granted nodes, assets
//! under a node, lazily-expanded tree children, per-asset system users and
//! granted applications.
//!
//! Results are plain serde types; transports render them as they see fit.

mod handler;
mod types;

pub use handler::PermissionQueryHandler;
pub use types::{AssetSystemUser, HandlerError, HandlerResult, TreeNode, TreeNodeMeta};

#[cfg(test)]
mod tests;
