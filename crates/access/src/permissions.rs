//! Permission definitions and the action-alias table.

use serde::{Deserialize, Serialize};

use meridian_core::{Entity, PermissionId, ValueObject};

/// Canonical action vocabulary reported for module permission listings.
pub const CANONICAL_ACTIONS: [&str; 6] = ["create", "read", "update", "delete", "view", "edit"];

/// The alternate spelling of an action, if the alias table has one.
///
/// The platform's UI and API layers never agreed on one verb convention
/// (`view` vs `read`, `edit` vs `update`), so a grant stored under either
/// spelling satisfies a check for the other. The table is a fixed, finite
/// mapping; growing it is a code change, not data.
pub fn action_alias(action: &str) -> Option<&'static str> {
    match action {
        "view" => Some("read"),
        "read" => Some("view"),
        "edit" => Some("update"),
        "update" => Some("edit"),
        _ => None,
    }
}

/// Whether a stored grant satisfies a requested action, exact or via alias.
///
/// Actions outside the alias table match only themselves.
pub fn actions_match(requested: &str, granted: &str) -> bool {
    requested == granted || action_alias(requested) == Some(granted)
}

/// Identity of a permission: the `(module, action)` pair.
///
/// Globally unique across the catalog; the surrogate row id exists only for
/// storage and cross-references.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionKey {
    pub module: String,
    pub action: String,
}

impl PermissionKey {
    pub fn new(module: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            action: action.into(),
        }
    }
}

impl ValueObject for PermissionKey {}

impl core::fmt::Display for PermissionKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}:{}", self.module, self.action)
    }
}

/// A permission definition row.
///
/// Immutable once referenced by a role assignment; the catalog offers no
/// delete operation for this reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: PermissionId,
    pub module: String,
    pub action: String,
    pub description: String,
}

impl Permission {
    pub fn new(
        module: impl Into<String>,
        action: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: PermissionId::new(),
            module: module.into(),
            action: action.into(),
            description: description.into(),
        }
    }

    pub fn key(&self) -> PermissionKey {
        PermissionKey::new(self.module.clone(), self.action.clone())
    }
}

impl Entity for Permission {
    type Id = PermissionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
