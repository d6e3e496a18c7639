//! Role and assignment records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use meridian_core::{Entity, PermissionId, RoleId, RolePermissionId, UserId, UserRoleId};

/// A named bundle of permissions.
///
/// # Invariants
/// - `name` is unique across the deployment (enforced where roles are
///   created, outside this core).
/// - System roles are protected from deletion/rename by the administrative
///   layer; nothing in this core mutates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub description: String,
    pub is_system_role: bool,
}

impl Role {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: RoleId::new(),
            name: name.into(),
            description: description.into(),
            is_system_role: false,
        }
    }

    pub fn system(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            is_system_role: true,
            ..Self::new(name, description)
        }
    }
}

impl Entity for Role {
    type Id = RoleId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Join row granting one permission to one role.
///
/// `(role_id, permission_id)` is unique; assigning an existing pairing is an
/// idempotent no-op, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePermission {
    pub id: RolePermissionId,
    pub role_id: RoleId,
    pub permission_id: PermissionId,
}

impl RolePermission {
    pub fn new(role_id: RoleId, permission_id: PermissionId) -> Self {
        Self {
            id: RolePermissionId::new(),
            role_id,
            permission_id,
        }
    }
}

impl Entity for RolePermission {
    type Id = RolePermissionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Join row putting one user in one role.
///
/// `(user_id, role_id)` is unique; re-assignment is idempotent. A user may
/// hold several roles concurrently; their effective permission set is the
/// union across all of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRole {
    pub id: UserRoleId,
    pub user_id: UserId,
    pub role_id: RoleId,
    pub assigned_by: UserId,
    pub assigned_at: DateTime<Utc>,
}

impl UserRole {
    pub fn new(user_id: UserId, role_id: RoleId, assigned_by: UserId) -> Self {
        Self {
            id: UserRoleId::new(),
            user_id,
            role_id,
            assigned_by,
            assigned_at: Utc::now(),
        }
    }
}

impl Entity for UserRole {
    type Id = UserRoleId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
