//! `meridian-access` — pure authorization boundary for the Meridian platform.
//!
//! This crate is intentionally decoupled from HTTP and storage: it evaluates
//! `(module, action)` decisions over permission snapshots and computes
//! hierarchical visibility over supplied org data. The store-backed
//! components (catalog, assignments, directory, filter) live in
//! `meridian-infra`.

pub mod evaluator;
pub mod hierarchy;
pub mod permissions;
pub mod principal;
pub mod roles;
pub mod visibility;

pub use evaluator::{
    explain_access, has_module_access, has_permission, is_super_admin, module_permissions,
    AccessExplanation, DenialKind, DenialReason, PermissionMap,
};
pub use hierarchy::{accessible_user_ids, subordinate_closure};
pub use permissions::{
    action_alias, actions_match, Permission, PermissionKey, CANONICAL_ACTIONS,
};
pub use principal::Principal;
pub use roles::{Role, RolePermission, UserRole};
pub use visibility::{
    can_modify_item, filter_by_hierarchical_access, has_access_to_item, OwnedRecord,
};
