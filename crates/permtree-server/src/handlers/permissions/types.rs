//! Data types for permission queries.

use serde::Serialize;

use permtree_domain::model::{Actions, Node, SystemUserId};
use permtree_domain::DomainError;

/// A node rendered for a lazily-loaded tree widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    /// The node key; children reference it through `p_id`.
    pub id: String,
    pub name: String,
    pub title: String,
    /// Parent key, empty for roots.
    pub p_id: String,
    pub is_parent: bool,
    pub open: bool,
    pub meta: TreeNodeMeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNodeMeta {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub node_id: String,
    pub depth: usize,
}

impl TreeNode {
    /// Nodes always render as expandable; whether anything is visible
    /// below is only known once the caller expands them.
    pub fn from_node(node: &Node) -> Self {
        Self {
            id: node.key.to_string(),
            name: node.value.clone(),
            title: node.value.clone(),
            p_id: node
                .parent_key()
                .map(|k| k.to_string())
                .unwrap_or_default(),
            is_parent: true,
            open: node.key.is_root(),
            meta: TreeNodeMeta {
                kind: "node",
                node_id: node.id.to_string(),
                depth: node.key.depth(),
            },
        }
    }
}

/// A system user on an asset together with the actions granted on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetSystemUser {
    pub system_user: SystemUserId,
    /// Lowercase action names, e.g. `["connect", "upload"]`.
    pub actions: Vec<&'static str>,
}

impl AssetSystemUser {
    pub fn new(system_user: SystemUserId, actions: Actions) -> Self {
        Self {
            system_user,
            actions: actions.names(),
        }
    }
}

/// Errors returned by query handlers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandlerError {
    /// Malformed caller input (principal, key).
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Resolver or storage failure.
    #[error("query failed: {message}")]
    Internal { message: String },
}

impl From<DomainError> for HandlerError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { kind, id } => HandlerError::NotFound { kind, id },
            DomainError::InvalidPrincipal { .. } | DomainError::InconsistentKey { .. } => {
                HandlerError::InvalidRequest {
                    message: err.to_string(),
                }
            }
            DomainError::StorageError { message } => HandlerError::Internal { message },
        }
    }
}

/// Result type for handler operations.
pub type HandlerResult<T> = Result<T, HandlerError>;
