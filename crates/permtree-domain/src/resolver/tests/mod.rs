//! Tests for the permission resolver module.
//!
//! Organized by functionality:
//! - Grant index (direct, inherited, validity, unknown principals)
//! - Asset resolution (subtree containment, direct grants, node scoping)
//! - Tree expansion (root collapse, pass-through pruning, real children)
//! - Action aggregation
//! - Application grants and caching

mod mocks;
