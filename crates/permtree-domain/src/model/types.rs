//! Core type definitions for the inventory and its grants.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::actions::Actions;
use super::ids::{
    ApplicationId, AssetId, NodeId, PermissionId, SystemUserId, UserGroupId, UserId,
};
use super::path::PathKey;
use crate::error::DomainError;

/// The subject of a grant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Principal {
    User(UserId),
    Group(UserGroupId),
}

impl Principal {
    pub fn user(id: impl Into<String>) -> Self {
        Self::User(UserId::new(id))
    }

    pub fn group(id: impl Into<String>) -> Self {
        Self::Group(UserGroupId::new(id))
    }

    /// Parses `"user:<id>"` or `"group:<id>"`.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let invalid = |reason: &str| DomainError::InvalidPrincipal {
            value: value.to_string(),
            reason: reason.to_string(),
        };
        let (kind, id) = value
            .split_once(':')
            .ok_or_else(|| invalid("principal must be in 'user:<id>' or 'group:<id>' format"))?;
        if id.is_empty() {
            return Err(invalid("principal id cannot be empty"));
        }
        match kind {
            "user" => Ok(Self::user(id)),
            "group" => Ok(Self::group(id)),
            _ => Err(invalid("principal kind must be 'user' or 'group'")),
        }
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Principal::User(id) => write!(f, "user:{id}"),
            Principal::Group(id) => write!(f, "group:{id}"),
        }
    }
}

/// A hierarchy element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub key: PathKey,
    /// Display name.
    pub value: String,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, key: PathKey, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            key,
            value: value.into(),
        }
    }

    /// Key of the parent node; `None` for roots.
    pub fn parent_key(&self) -> Option<PathKey> {
        self.key.parent()
    }
}

/// A managed host. Assets may sit under several nodes at once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub hostname: String,
    #[serde(default)]
    pub ip: String,
    /// Keys of the nodes this asset is a member of.
    #[serde(default)]
    pub nodes: BTreeSet<PathKey>,
}

impl Asset {
    pub fn new(id: impl Into<AssetId>, hostname: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            hostname: hostname.into(),
            ip: String::new(),
            nodes: BTreeSet::new(),
        }
    }

    pub fn in_node(mut self, key: PathKey) -> Self {
        self.nodes.insert(key);
        self
    }

    /// True if some membership lies at `key` or below it.
    pub fn is_under(&self, key: &PathKey) -> bool {
        self.nodes.iter().any(|m| m.is_self_or_descendant_of(key))
    }
}

/// An application (database, remote app, ...) granted through
/// [`ApplicationPermission`] records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub name: String,
    #[serde(default)]
    pub category: String,
}

/// A grant binding principals to nodes and assets, with per-system-user
/// actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRecord {
    pub id: PermissionId,
    #[serde(default)]
    pub name: String,
    /// Validity as evaluated by the administration layer.
    #[serde(default = "default_true")]
    pub valid: bool,
    #[serde(default)]
    pub users: BTreeSet<UserId>,
    #[serde(default)]
    pub user_groups: BTreeSet<UserGroupId>,
    /// Whole-subtree grants.
    #[serde(default)]
    pub nodes: BTreeSet<NodeId>,
    /// Single-asset grants.
    #[serde(default)]
    pub assets: BTreeSet<AssetId>,
    #[serde(default)]
    pub system_users: BTreeMap<SystemUserId, Actions>,
}

impl PermissionRecord {
    pub fn new(id: impl Into<PermissionId>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            valid: true,
            users: BTreeSet::new(),
            user_groups: BTreeSet::new(),
            nodes: BTreeSet::new(),
            assets: BTreeSet::new(),
            system_users: BTreeMap::new(),
        }
    }

    pub fn is_currently_valid(&self) -> bool {
        self.valid
    }

    /// True if the record names the principal directly.
    pub fn names_principal(&self, principal: &Principal) -> bool {
        match principal {
            Principal::User(id) => self.users.contains(id),
            Principal::Group(id) => self.user_groups.contains(id),
        }
    }

    pub fn with_validity(mut self, valid: bool) -> Self {
        self.valid = valid;
        self
    }

    pub fn for_user(mut self, user: impl Into<UserId>) -> Self {
        self.users.insert(user.into());
        self
    }

    pub fn for_group(mut self, group: impl Into<UserGroupId>) -> Self {
        self.user_groups.insert(group.into());
        self
    }

    pub fn granting_node(mut self, node: impl Into<NodeId>) -> Self {
        self.nodes.insert(node.into());
        self
    }

    pub fn granting_asset(mut self, asset: impl Into<AssetId>) -> Self {
        self.assets.insert(asset.into());
        self
    }

    /// Adds actions for a system user, merging with any already present.
    pub fn allowing(mut self, system_user: impl Into<SystemUserId>, actions: Actions) -> Self {
        let entry = self
            .system_users
            .entry(system_user.into())
            .or_insert(Actions::empty());
        *entry |= actions;
        self
    }
}

/// A grant binding principals to applications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationPermission {
    pub id: PermissionId,
    #[serde(default = "default_true")]
    pub valid: bool,
    #[serde(default)]
    pub users: BTreeSet<UserId>,
    #[serde(default)]
    pub user_groups: BTreeSet<UserGroupId>,
    #[serde(default)]
    pub applications: BTreeSet<ApplicationId>,
}

impl ApplicationPermission {
    pub fn new(id: impl Into<PermissionId>) -> Self {
        Self {
            id: id.into(),
            valid: true,
            users: BTreeSet::new(),
            user_groups: BTreeSet::new(),
            applications: BTreeSet::new(),
        }
    }

    pub fn is_currently_valid(&self) -> bool {
        self.valid
    }

    pub fn names_principal(&self, principal: &Principal) -> bool {
        match principal {
            Principal::User(id) => self.users.contains(id),
            Principal::Group(id) => self.user_groups.contains(id),
        }
    }

    pub fn for_user(mut self, user: impl Into<UserId>) -> Self {
        self.users.insert(user.into());
        self
    }

    pub fn for_group(mut self, group: impl Into<UserGroupId>) -> Self {
        self.user_groups.insert(group.into());
        self
    }

    pub fn granting(mut self, application: impl Into<ApplicationId>) -> Self {
        self.applications.insert(application.into());
        self
    }
}

fn default_true() -> bool {
    true
}
