//! Role-to-permission and user-to-role assignment rows.
//!
//! Join-table writes are idempotent under concurrent callers: the store
//! layer provides per-operation exclusivity (see `store`), and the upsert
//! paths re-check the unique pair before inserting, so a duplicate assign
//! is a no-op and a remove of an absent pairing succeeds silently.

use std::collections::HashSet;

use meridian_access::{
    has_permission, Permission, PermissionKey, PermissionMap, Role, RolePermission, UserRole,
};
use meridian_core::{
    DomainError, DomainResult, PermissionId, RoleId, RolePermissionId, UserId, UserRoleId,
};
use meridian_observability::AccessAudit;

use crate::store::KeyValueStore;

/// Store-backed role/assignment registry.
pub struct RoleAssignmentStore<R, P, RP, UR> {
    roles: R,
    permissions: P,
    role_permissions: RP,
    user_roles: UR,
}

impl<R, P, RP, UR> RoleAssignmentStore<R, P, RP, UR>
where
    R: KeyValueStore<RoleId, Role>,
    P: KeyValueStore<PermissionId, Permission>,
    RP: KeyValueStore<RolePermissionId, RolePermission>,
    UR: KeyValueStore<UserRoleId, UserRole>,
{
    pub fn new(roles: R, permissions: P, role_permissions: RP, user_roles: UR) -> Self {
        Self {
            roles,
            permissions,
            role_permissions,
            user_roles,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Roles
    // ─────────────────────────────────────────────────────────────────────

    /// Register a role. Role names are unique across the deployment.
    pub fn create_role(&self, name: &str, description: &str) -> DomainResult<Role> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("role name must be non-empty"));
        }
        if self.roles.all()?.iter().any(|r| r.name == name) {
            return Err(DomainError::already_exists(format!("role '{name}'")));
        }

        let role = Role::new(name, description);
        self.roles.put(role.id, role.clone())?;
        tracing::info!(role_id = %role.id, name, "role created");
        Ok(role)
    }

    pub fn role_by_id(&self, id: &RoleId) -> DomainResult<Role> {
        self.roles
            .get(id)?
            .ok_or_else(|| DomainError::not_found(format!("role {id}")))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Role ↔ Permission
    // ─────────────────────────────────────────────────────────────────────

    /// Grant a permission to a role. Idempotent; fails with `NotFound` when
    /// either id is unknown.
    pub fn assign_permission_to_role(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> DomainResult<()> {
        self.role_by_id(&role_id)?;
        self.permissions
            .get(&permission_id)?
            .ok_or_else(|| DomainError::not_found(format!("permission {permission_id}")))?;

        let already = self
            .role_permissions
            .all()?
            .into_iter()
            .any(|rp| rp.role_id == role_id && rp.permission_id == permission_id);
        if already {
            tracing::debug!(%role_id, %permission_id, "permission already assigned to role");
            return Ok(());
        }

        let row = RolePermission::new(role_id, permission_id);
        self.role_permissions.put(row.id, row)?;
        tracing::info!(%role_id, %permission_id, "permission assigned to role");
        Ok(())
    }

    /// Revoke a permission from a role. Removing an absent pairing succeeds
    /// silently.
    pub fn remove_permission_from_role(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> DomainResult<()> {
        let existing = self
            .role_permissions
            .all()?
            .into_iter()
            .find(|rp| rp.role_id == role_id && rp.permission_id == permission_id);

        if let Some(row) = existing {
            self.role_permissions.remove(&row.id)?;
            tracing::info!(%role_id, %permission_id, "permission removed from role");
        }
        Ok(())
    }

    pub fn role_permission_rows(&self, role_id: RoleId) -> DomainResult<Vec<RolePermission>> {
        Ok(self
            .role_permissions
            .all()?
            .into_iter()
            .filter(|rp| rp.role_id == role_id)
            .collect())
    }

    // ─────────────────────────────────────────────────────────────────────
    // User ↔ Role
    // ─────────────────────────────────────────────────────────────────────

    /// Put a user in a role. Idempotent: re-assigning returns the existing
    /// row with its original `assigned_at`. Fails with `NotFound` when the
    /// role is unknown; the user id was already resolved by the
    /// authentication layer and is taken as given.
    pub fn assign_role_to_user(
        &self,
        user_id: UserId,
        role_id: RoleId,
        assigned_by: UserId,
    ) -> DomainResult<UserRole> {
        self.role_by_id(&role_id)?;

        let existing = self
            .user_roles
            .all()?
            .into_iter()
            .find(|ur| ur.user_id == user_id && ur.role_id == role_id);
        if let Some(row) = existing {
            tracing::debug!(%user_id, %role_id, "role already assigned to user");
            return Ok(row);
        }

        let row = UserRole::new(user_id, role_id, assigned_by);
        self.user_roles.put(row.id, row.clone())?;
        tracing::info!(%user_id, %role_id, %assigned_by, "role assigned to user");
        Ok(row)
    }

    /// Take a user out of a role. Removing an absent pairing succeeds
    /// silently.
    pub fn remove_role_from_user(&self, user_id: UserId, role_id: RoleId) -> DomainResult<()> {
        let existing = self
            .user_roles
            .all()?
            .into_iter()
            .find(|ur| ur.user_id == user_id && ur.role_id == role_id);

        if let Some(row) = existing {
            self.user_roles.remove(&row.id)?;
            tracing::info!(%user_id, %role_id, "role removed from user");
        }
        Ok(())
    }

    pub fn user_role_rows(&self, user_id: UserId) -> DomainResult<Vec<UserRole>> {
        Ok(self
            .user_roles
            .all()?
            .into_iter()
            .filter(|ur| ur.user_id == user_id)
            .collect())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Resolution
    // ─────────────────────────────────────────────────────────────────────

    /// Union of permissions across all of the user's roles, de-duplicated
    /// by `(module, action)`.
    pub fn user_permissions(&self, user_id: UserId) -> DomainResult<Vec<Permission>> {
        let role_ids: HashSet<RoleId> = self
            .user_role_rows(user_id)?
            .into_iter()
            .map(|ur| ur.role_id)
            .collect();

        let granted_ids: HashSet<PermissionId> = self
            .role_permissions
            .all()?
            .into_iter()
            .filter(|rp| role_ids.contains(&rp.role_id))
            .map(|rp| rp.permission_id)
            .collect();

        let mut seen: HashSet<PermissionKey> = HashSet::new();
        let mut permissions = Vec::new();
        for permission_id in granted_ids {
            match self.permissions.get(&permission_id)? {
                Some(permission) => {
                    if seen.insert(permission.key()) {
                        permissions.push(permission);
                    }
                }
                None => {
                    // Dangling grant row; tolerated, but worth an audit trail.
                    tracing::warn!(
                        %user_id,
                        %permission_id,
                        "role grant references a missing permission"
                    );
                }
            }
        }
        Ok(permissions)
    }

    /// The user's capability snapshot for the evaluator.
    pub fn permission_map_for_user(&self, user_id: UserId) -> DomainResult<PermissionMap> {
        Ok(PermissionMap::from_permissions(
            &self.user_permissions(user_id)?,
        ))
    }

    /// Decide `(module, action)` for a user, failing closed.
    ///
    /// Every decision leaves an audit record. When the snapshot cannot be
    /// built (store failure), the request is denied and the failure logged
    /// with full context; access is never granted on indeterminate state.
    pub fn check_permission(&self, user_id: UserId, module: &str, action: &str) -> bool {
        match self.permission_map_for_user(user_id) {
            Ok(map) => {
                let granted = has_permission(&map, module, action);
                let audit = if granted {
                    AccessAudit::granted(user_id, module, action)
                } else {
                    AccessAudit::denied(user_id, module, action)
                };
                audit.emit();
                granted
            }
            Err(error) => {
                AccessAudit::degraded(user_id, module, action, error.to_string()).emit();
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PermissionCatalog;
    use crate::store::InMemoryStore;
    use std::sync::Arc;

    type Stores = RoleAssignmentStore<
        Arc<InMemoryStore<RoleId, Role>>,
        Arc<InMemoryStore<PermissionId, Permission>>,
        Arc<InMemoryStore<RolePermissionId, RolePermission>>,
        Arc<InMemoryStore<UserRoleId, UserRole>>,
    >;

    fn setup() -> (Stores, PermissionCatalog<Arc<InMemoryStore<PermissionId, Permission>>>) {
        let permissions = Arc::new(InMemoryStore::new());
        let assignments = RoleAssignmentStore::new(
            Arc::new(InMemoryStore::new()),
            permissions.clone(),
            Arc::new(InMemoryStore::new()),
            Arc::new(InMemoryStore::new()),
        );
        (assignments, PermissionCatalog::new(permissions))
    }

    #[test]
    fn assign_role_to_user_is_idempotent() {
        let (assignments, _) = setup();
        let role = assignments.create_role("manager", "").unwrap();
        let (user, admin) = (UserId::new(), UserId::new());

        let first = assignments
            .assign_role_to_user(user, role.id, admin)
            .unwrap();
        let second = assignments
            .assign_role_to_user(user, role.id, admin)
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.assigned_at, second.assigned_at);
        assert_eq!(assignments.user_role_rows(user).unwrap().len(), 1);
    }

    #[test]
    fn assign_unknown_role_is_not_found() {
        let (assignments, _) = setup();
        let err = assignments
            .assign_role_to_user(UserId::new(), RoleId::new(), UserId::new())
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn assign_permission_to_role_is_idempotent() {
        let (assignments, catalog) = setup();
        let role = assignments.create_role("manager", "").unwrap();
        let permission = catalog.create_permission("sales", "read", "").unwrap();

        assignments
            .assign_permission_to_role(role.id, permission.id)
            .unwrap();
        assignments
            .assign_permission_to_role(role.id, permission.id)
            .unwrap();

        assert_eq!(assignments.role_permission_rows(role.id).unwrap().len(), 1);
    }

    #[test]
    fn assign_permission_checks_both_ids() {
        let (assignments, catalog) = setup();
        let role = assignments.create_role("manager", "").unwrap();
        let permission = catalog.create_permission("sales", "read", "").unwrap();

        assert!(matches!(
            assignments
                .assign_permission_to_role(RoleId::new(), permission.id)
                .unwrap_err(),
            DomainError::NotFound(_)
        ));
        assert!(matches!(
            assignments
                .assign_permission_to_role(role.id, PermissionId::new())
                .unwrap_err(),
            DomainError::NotFound(_)
        ));
    }

    #[test]
    fn removals_are_idempotent() {
        let (assignments, catalog) = setup();
        let role = assignments.create_role("manager", "").unwrap();
        let permission = catalog.create_permission("sales", "read", "").unwrap();
        let user = UserId::new();

        // Removing pairings that were never made succeeds silently.
        assignments
            .remove_permission_from_role(role.id, permission.id)
            .unwrap();
        assignments.remove_role_from_user(user, role.id).unwrap();

        assignments
            .assign_permission_to_role(role.id, permission.id)
            .unwrap();
        assignments
            .remove_permission_from_role(role.id, permission.id)
            .unwrap();
        assert!(assignments.role_permission_rows(role.id).unwrap().is_empty());
    }

    #[test]
    fn duplicate_role_name_rejected() {
        let (assignments, _) = setup();
        assignments.create_role("manager", "").unwrap();
        let err = assignments.create_role("manager", "again").unwrap_err();
        assert!(matches!(err, DomainError::AlreadyExists(_)));
    }

    #[test]
    fn user_permissions_union_across_roles() {
        let (assignments, catalog) = setup();
        let sales_role = assignments.create_role("sales", "").unwrap();
        let support_role = assignments.create_role("support", "").unwrap();

        let read = catalog.create_permission("crm_contacts", "read", "").unwrap();
        let update = catalog
            .create_permission("crm_contacts", "update", "")
            .unwrap();

        assignments
            .assign_permission_to_role(sales_role.id, read.id)
            .unwrap();
        // Both roles grant read; the union must de-duplicate it.
        assignments
            .assign_permission_to_role(support_role.id, read.id)
            .unwrap();
        assignments
            .assign_permission_to_role(support_role.id, update.id)
            .unwrap();

        let user = UserId::new();
        let admin = UserId::new();
        assignments
            .assign_role_to_user(user, sales_role.id, admin)
            .unwrap();
        assignments
            .assign_role_to_user(user, support_role.id, admin)
            .unwrap();

        let mut keys: Vec<String> = assignments
            .user_permissions(user)
            .unwrap()
            .iter()
            .map(|p| p.key().to_string())
            .collect();
        keys.sort();
        assert_eq!(keys, vec!["crm_contacts:read", "crm_contacts:update"]);
    }

    #[test]
    fn check_permission_decides_through_roles() {
        let (assignments, catalog) = setup();
        let role = assignments.create_role("sales", "").unwrap();
        let read = catalog.create_permission("crm_contacts", "read", "").unwrap();
        assignments
            .assign_permission_to_role(role.id, read.id)
            .unwrap();

        let user = UserId::new();
        assignments
            .assign_role_to_user(user, role.id, UserId::new())
            .unwrap();

        assert!(assignments.check_permission(user, "crm_contacts", "view"));
        assert!(!assignments.check_permission(user, "crm_contacts", "delete"));
        assert!(!assignments.check_permission(UserId::new(), "crm_contacts", "read"));
    }
}
