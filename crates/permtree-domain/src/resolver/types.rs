//! Derived, per-call resolution results.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{
    Actions, AssetId, Node, NodeId, PathKey, PermissionId, PermissionRecord, SystemUserId,
};

/// Actions per system user for one (principal, asset) pair.
pub type ActionMap = BTreeMap<SystemUserId, Actions>;

/// The currently-valid permission records that apply to a principal.
///
/// Holding the records (not only their ids) lets every downstream resolver
/// work from the same snapshot without querying the grant store again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrantSet {
    records: BTreeMap<PermissionId, PermissionRecord>,
}

impl GrantSet {
    /// Builds a grant set, dropping invalid records and duplicate ids.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = PermissionRecord>,
    {
        let records = records
            .into_iter()
            .filter(PermissionRecord::is_currently_valid)
            .map(|r| (r.id.clone(), r))
            .collect();
        Self { records }
    }

    pub fn ids(&self) -> BTreeSet<PermissionId> {
        self.records.keys().cloned().collect()
    }

    pub fn records(&self) -> impl Iterator<Item = &PermissionRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Node ids granted as whole subtrees by any record.
    pub fn node_ids(&self) -> BTreeSet<NodeId> {
        self.records
            .values()
            .flat_map(|r| r.nodes.iter().cloned())
            .collect()
    }

    /// Asset ids granted directly by any record.
    pub fn asset_ids(&self) -> BTreeSet<AssetId> {
        self.records
            .values()
            .flat_map(|r| r.assets.iter().cloned())
            .collect()
    }
}

/// Granted nodes, split by how they were reached.
///
/// `granted` nodes are whole-subtree grants. `touched` nodes only contain a
/// directly-granted asset; their subtree is not granted. A node can appear
/// in both maps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrantedNodeSet {
    pub granted: BTreeMap<PathKey, Node>,
    pub touched: BTreeMap<PathKey, Node>,
}

impl GrantedNodeSet {
    pub fn granted_keys(&self) -> impl Iterator<Item = &PathKey> {
        self.granted.keys()
    }

    pub fn touch_keys(&self) -> impl Iterator<Item = &PathKey> {
        self.touched.keys()
    }

    /// Granted and touched keys, deduplicated and sorted.
    pub fn all_keys(&self) -> BTreeSet<&PathKey> {
        self.granted.keys().chain(self.touched.keys()).collect()
    }

    /// True if `key` is granted or lies inside a granted subtree.
    pub fn is_fully_granted(&self, key: &PathKey) -> bool {
        self.granted
            .keys()
            .any(|granted| key.is_self_or_descendant_of(granted))
    }

    /// Union of granted and touched nodes, sorted by key.
    pub fn all(&self) -> Vec<Node> {
        let mut merged = self.granted.clone();
        for (key, node) in &self.touched {
            merged.entry(key.clone()).or_insert_with(|| node.clone());
        }
        merged.into_values().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.granted.is_empty() && self.touched.is_empty()
    }
}
