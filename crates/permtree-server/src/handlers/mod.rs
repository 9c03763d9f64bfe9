//! Query handlers.
//!
//! Handlers sit between callers (the CLI today) and the resolver: they parse
//! caller input, run resolver operations and shape results for output.

pub mod permissions;

pub use permissions::{
    AssetSystemUser, HandlerError, HandlerResult, PermissionQueryHandler, TreeNode, TreeNodeMeta,
};
