//! Session privilege levels.

use serde::{Deserialize, Serialize};

/// Privilege level carried by a session token.
///
/// Wire values are the upper-case strings used by the auth collaborator.
/// Anything else deserializes to [`Role::Unknown`], which is never
/// privileged — a malformed role must fail closed, not error out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "USER")]
    User,
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "SUPERADMIN")]
    SuperAdmin,
    #[serde(other, rename = "UNKNOWN")]
    Unknown,
}

impl Role {
    /// Whether this role may access admin surfaces.
    pub fn is_privileged(self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }

    /// Wire representation, as stored in tokens and the users table.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
            Role::SuperAdmin => "SUPERADMIN",
            Role::Unknown => "UNKNOWN",
        }
    }
}
