//! Permission catalog: definition rows keyed by surrogate id, identified by
//! `(module, action)`.

use meridian_access::{Permission, PermissionKey};
use meridian_core::{DomainError, DomainResult, PermissionId};

use crate::store::KeyValueStore;

/// Store-backed permission catalog.
pub struct PermissionCatalog<S> {
    permissions: S,
}

impl<S> PermissionCatalog<S>
where
    S: KeyValueStore<PermissionId, Permission>,
{
    pub fn new(permissions: S) -> Self {
        Self { permissions }
    }

    /// Register a new `(module, action)` permission.
    ///
    /// The pair is globally unique; a duplicate registration fails with
    /// `AlreadyExists`. There is no delete: a permission referenced by a
    /// role assignment must stay resolvable.
    pub fn create_permission(
        &self,
        module: &str,
        action: &str,
        description: &str,
    ) -> DomainResult<Permission> {
        let module = module.trim();
        let action = action.trim();
        if module.is_empty() || action.is_empty() {
            return Err(DomainError::validation(
                "permission module and action must be non-empty",
            ));
        }

        let key = PermissionKey::new(module, action);
        if self.find_by_key(&key)?.is_some() {
            return Err(DomainError::already_exists(format!("permission '{key}'")));
        }

        let permission = Permission::new(module, action, description);
        self.permissions.put(permission.id, permission.clone())?;
        tracing::info!(permission_id = %permission.id, module, action, "permission created");
        Ok(permission)
    }

    pub fn all_permissions(&self) -> DomainResult<Vec<Permission>> {
        self.permissions.all()
    }

    pub fn permission_by_id(&self, id: &PermissionId) -> DomainResult<Permission> {
        self.permissions
            .get(id)?
            .ok_or_else(|| DomainError::not_found(format!("permission {id}")))
    }

    pub fn find_by_key(&self, key: &PermissionKey) -> DomainResult<Option<Permission>> {
        Ok(self
            .permissions
            .all()?
            .into_iter()
            .find(|p| &p.key() == key))
    }
}
