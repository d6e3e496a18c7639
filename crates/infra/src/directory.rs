//! Org directory: principal lookups and subordinate resolution over the
//! users collection.

use meridian_access::{hierarchy, Principal};
use meridian_core::{DomainResult, UserId};

use crate::store::KeyValueStore;

/// Store-backed view of the manager-link forest.
pub struct OrgDirectory<S> {
    users: S,
}

impl<S> OrgDirectory<S>
where
    S: KeyValueStore<UserId, Principal>,
{
    pub fn new(users: S) -> Self {
        Self { users }
    }

    /// Insert or replace a principal record (admin sync path).
    pub fn upsert_principal(&self, principal: Principal) -> DomainResult<()> {
        self.users.put(principal.id, principal)
    }

    pub fn principal(&self, id: &UserId) -> DomainResult<Option<Principal>> {
        self.users.get(id)
    }

    /// Principals whose `manager_id` is `user_id`.
    pub fn direct_subordinates(&self, user_id: UserId) -> DomainResult<Vec<Principal>> {
        Ok(self
            .users
            .all()?
            .into_iter()
            .filter(|p| p.reports_to(user_id))
            .collect())
    }

    /// Transitive subordinates of `user_id`.
    ///
    /// The traversal runs against one snapshot of the collection, so a
    /// concurrent manager-link change cannot extend the walk mid-flight;
    /// cyclic corruption is bounded by the visited set inside the closure.
    pub fn all_subordinates(&self, user_id: UserId) -> DomainResult<Vec<Principal>> {
        let snapshot = self.users.all()?;
        Ok(hierarchy::subordinate_closure(user_id, |manager| {
            snapshot
                .iter()
                .filter(|p| p.reports_to(manager))
                .cloned()
                .collect()
        }))
    }

    /// `user_id` plus every transitive subordinate id.
    pub fn accessible_user_ids(&self, user_id: UserId) -> DomainResult<Vec<UserId>> {
        let mut ids = vec![user_id];
        ids.extend(self.all_subordinates(user_id)?.into_iter().map(|p| p.id));
        Ok(ids)
    }
}
