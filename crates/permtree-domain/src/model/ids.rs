//! Strongly-typed identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Identifier of a user.
    UserId
);
string_id!(
    /// Identifier of a user group.
    UserGroupId
);
string_id!(
    /// Identifier of a hierarchy node (distinct from its [`PathKey`](super::PathKey)).
    NodeId
);
string_id!(
    /// Identifier of a managed asset.
    AssetId
);
string_id!(
    /// Identifier of a system user (the account used on an asset).
    SystemUserId
);
string_id!(
    /// Identifier of an asset permission record.
    PermissionId
);
string_id!(
    /// Identifier of an application.
    ApplicationId
);
