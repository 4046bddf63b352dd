//! Users, permissions and permission groups

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::vocabulary::Role;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Manager of the same-role peers.
    pub is_manager: bool,
    pub is_active: bool,
}

impl User {
    pub fn new(name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            role,
            is_manager: false,
            is_active: true,
        }
    }

    #[must_use]
    pub fn manager(mut self) -> Self {
        self.is_manager = true;
        self
    }

    /// Whether `self` manages `other`: same role, manager flag, different user.
    pub fn manages(&self, other: &Self) -> bool {
        self.is_manager && self.role == other.role && self.id != other.id
    }
}

/// A named capability, e.g. `leads.update`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Permission(pub String);

impl Permission {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGroup {
    pub id: Uuid,
    pub name: String,
    pub permissions: BTreeSet<Permission>,
}

/// Direct permission row with its pivot metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGrant {
    pub permission: Permission,
    pub granted_by: Option<Uuid>,
    pub granted_at: DateTime<Utc>,
}
