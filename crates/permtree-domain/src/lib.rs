//! permtree-domain: Hierarchical grant resolution
//!
//! This crate contains the core resolution logic including:
//! - Materialized-path keys and the inventory/grant model
//! - Collaborator traits for hierarchy, grant, asset and membership data
//! - The permission resolver (grant index, asset/node resolution,
//!   tree expansion, action aggregation)
//! - Grant set caching
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               permtree-domain                │
//! ├─────────────────────────────────────────────┤
//! │  model/      - Ids, PathKey, records        │
//! │  resolver/   - Grant resolution engine      │
//! │  cache/      - Grant set caching            │
//! └─────────────────────────────────────────────┘
//! ```

pub mod cache;
pub mod error;
pub mod model;
pub mod resolver;

// Re-export commonly used types at the crate root
pub use cache::{GrantCache, GrantCacheConfig};
pub use error::{DomainError, DomainResult};
pub use resolver::{PermissionResolver, ResolverConfig};
