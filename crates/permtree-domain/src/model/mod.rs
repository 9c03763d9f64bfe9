//! Inventory and grant model.
//!
//! This module contains:
//! - Identifiers and the [`Principal`] enum
//! - Materialized-path [`PathKey`]s
//! - Nodes, assets, applications and permission records
//! - The [`Actions`] bitset

mod actions;
mod ids;
mod path;
#[cfg(test)]
mod path_proptest;
mod types;

pub use actions::Actions;
pub use ids::*;
pub use path::{minimal_cover, PathKey, SEPARATOR};
pub use types::*;
