//! Hierarchical access filtering with restrictive degradation.
//!
//! Thin wrapper over `OrgDirectory` and the pure predicates in
//! `meridian-access`: resolves the visible principal set for a user and
//! narrows record listings to it. When the directory cannot be read the
//! set degrades to the user alone — visibility is never widened by a
//! failure, and the failure is logged rather than swallowed.

use meridian_access::{visibility, OwnedRecord, Principal};
use meridian_core::UserId;

use crate::directory::OrgDirectory;
use crate::store::KeyValueStore;

pub struct HierarchicalAccessFilter<S> {
    directory: OrgDirectory<S>,
}

impl<S> HierarchicalAccessFilter<S>
where
    S: KeyValueStore<UserId, Principal>,
{
    pub fn new(directory: OrgDirectory<S>) -> Self {
        Self { directory }
    }

    /// The principals whose records `user_id` may see: self + transitive
    /// subordinates, or `[user_id]` alone when resolution fails.
    pub fn accessible_user_ids(&self, user_id: UserId) -> Vec<UserId> {
        match self.directory.accessible_user_ids(user_id) {
            Ok(ids) => ids,
            Err(error) => {
                tracing::error!(
                    %user_id,
                    %error,
                    "subordinate resolution failed; restricting visibility to self"
                );
                vec![user_id]
            }
        }
    }

    /// Narrow `items` to the records visible to `user_id`, preserving order.
    pub fn visible_items<T: OwnedRecord>(&self, user_id: UserId, items: Vec<T>) -> Vec<T> {
        let accessible = self.accessible_user_ids(user_id);
        visibility::filter_by_hierarchical_access(items, &accessible)
    }

    pub fn can_view_item<T: OwnedRecord>(&self, user_id: UserId, item: &T) -> bool {
        visibility::has_access_to_item(item, &self.accessible_user_ids(user_id))
    }

    /// Mutation check; see `meridian_access::visibility::can_modify_item`.
    pub fn can_modify_item<T: OwnedRecord>(
        &self,
        user_id: UserId,
        item: &T,
        allow_subordinate_edit: bool,
    ) -> bool {
        visibility::can_modify_item(item, user_id, allow_subordinate_edit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use meridian_core::{DomainError, DomainResult};
    use std::sync::Arc;

    #[derive(Debug, Clone)]
    struct Deal {
        title: &'static str,
        created_by: UserId,
    }

    impl OwnedRecord for Deal {
        fn created_by(&self) -> UserId {
            self.created_by
        }
    }

    /// Store that refuses every call, standing in for an unavailable engine.
    struct UnavailableStore;

    impl KeyValueStore<UserId, Principal> for UnavailableStore {
        fn get(&self, _key: &UserId) -> DomainResult<Option<Principal>> {
            Err(DomainError::upstream("engine offline"))
        }

        fn put(&self, _key: UserId, _value: Principal) -> DomainResult<()> {
            Err(DomainError::upstream("engine offline"))
        }

        fn remove(&self, _key: &UserId) -> DomainResult<()> {
            Err(DomainError::upstream("engine offline"))
        }

        fn all(&self) -> DomainResult<Vec<Principal>> {
            Err(DomainError::upstream("engine offline"))
        }
    }

    fn filter_over(
        principals: Vec<Principal>,
    ) -> HierarchicalAccessFilter<Arc<InMemoryStore<UserId, Principal>>> {
        let store = Arc::new(InMemoryStore::new());
        let directory = OrgDirectory::new(store);
        for principal in principals {
            directory.upsert_principal(principal).unwrap();
        }
        HierarchicalAccessFilter::new(directory)
    }

    #[test]
    fn manager_sees_own_and_subordinate_records() {
        let (manager, employee, outsider) = (UserId::new(), UserId::new(), UserId::new());
        let filter = filter_over(vec![
            Principal::new(manager, None, "Mara"),
            Principal::new(employee, Some(manager), "Evan"),
            Principal::new(outsider, None, "Olga"),
        ]);

        let items = vec![
            Deal { title: "mine", created_by: manager },
            Deal { title: "reports", created_by: employee },
            Deal { title: "unrelated", created_by: outsider },
        ];

        let visible = filter.visible_items(manager, items);
        let titles: Vec<&str> = visible.iter().map(|d| d.title).collect();
        assert_eq!(titles, vec!["mine", "reports"]);
    }

    #[test]
    fn employee_sees_only_own_records() {
        let (manager, employee) = (UserId::new(), UserId::new());
        let filter = filter_over(vec![
            Principal::new(manager, None, "Mara"),
            Principal::new(employee, Some(manager), "Evan"),
        ]);

        let items = vec![
            Deal { title: "managers", created_by: manager },
            Deal { title: "own", created_by: employee },
        ];

        let visible = filter.visible_items(employee, items);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "own");
    }

    #[test]
    fn store_failure_restricts_to_self() {
        let user = UserId::new();
        let other = UserId::new();
        let filter = HierarchicalAccessFilter::new(OrgDirectory::new(UnavailableStore));

        // Degraded set is exactly the user: own records stay visible,
        // nothing else does.
        assert_eq!(filter.accessible_user_ids(user), vec![user]);

        let items = vec![
            Deal { title: "own", created_by: user },
            Deal { title: "reports", created_by: other },
        ];
        let visible = filter.visible_items(user, items);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "own");
    }

    #[test]
    fn modify_requires_ownership_or_opt_in() {
        let (manager, employee) = (UserId::new(), UserId::new());
        let filter = filter_over(vec![
            Principal::new(manager, None, "Mara"),
            Principal::new(employee, Some(manager), "Evan"),
        ]);

        let record = Deal { title: "reports", created_by: employee };
        assert!(filter.can_view_item(manager, &record));
        assert!(!filter.can_modify_item(manager, &record, false));
        assert!(filter.can_modify_item(manager, &record, true));
        assert!(filter.can_modify_item(employee, &record, false));
    }
}
