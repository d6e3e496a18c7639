//! Hierarchical visibility over owned records.
//!
//! Pure predicates over externally-resolved accessible-id sets. The
//! store-backed resolution (with its fail-restrictive degradation) lives in
//! `meridian-infra`.

use meridian_core::UserId;

/// A domain record carrying its creator.
///
/// CRM contacts, deals, tasks and the platform's other entities implement
/// this to participate in hierarchical listing filters. Ownership is fixed
/// at creation.
pub trait OwnedRecord {
    fn created_by(&self) -> UserId;
}

/// Retain the records whose creator is in `accessible`, preserving input
/// order.
pub fn filter_by_hierarchical_access<T: OwnedRecord>(
    items: Vec<T>,
    accessible: &[UserId],
) -> Vec<T> {
    items
        .into_iter()
        .filter(|item| accessible.contains(&item.created_by()))
        .collect()
}

/// Membership test matching `filter_by_hierarchical_access`.
pub fn has_access_to_item<T: OwnedRecord>(item: &T, accessible: &[UserId]) -> bool {
    accessible.contains(&item.created_by())
}

/// Whether `user_id` may mutate `item`.
///
/// Owners always may. Seeing a subordinate's record does not imply editing
/// it: mutation of non-owned records requires the explicit
/// `allow_subordinate_edit` opt-in at the call site, applied to records the
/// caller has already confirmed visible.
pub fn can_modify_item<T: OwnedRecord>(
    item: &T,
    user_id: UserId,
    allow_subordinate_edit: bool,
) -> bool {
    item.created_by() == user_id || allow_subordinate_edit
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Contact {
        name: &'static str,
        created_by: UserId,
    }

    impl OwnedRecord for Contact {
        fn created_by(&self) -> UserId {
            self.created_by
        }
    }

    #[test]
    fn filter_retains_only_accessible_creators() {
        let (a, b, z) = (UserId::new(), UserId::new(), UserId::new());
        let items = vec![
            Contact { name: "kept", created_by: a },
            Contact { name: "dropped", created_by: z },
        ];

        let filtered = filter_by_hierarchical_access(items, &[a, b]);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "kept");
    }

    #[test]
    fn filter_preserves_input_order() {
        let a = UserId::new();
        let items = vec![
            Contact { name: "first", created_by: a },
            Contact { name: "second", created_by: a },
            Contact { name: "third", created_by: a },
        ];

        let filtered = filter_by_hierarchical_access(items, &[a]);
        let names: Vec<&str> = filtered.iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn item_membership_matches_filter() {
        let (a, z) = (UserId::new(), UserId::new());
        let mine = Contact { name: "mine", created_by: a };
        let theirs = Contact { name: "theirs", created_by: z };

        assert!(has_access_to_item(&mine, &[a]));
        assert!(!has_access_to_item(&theirs, &[a]));
    }

    #[test]
    fn owner_may_always_modify() {
        let a = UserId::new();
        let record = Contact { name: "mine", created_by: a };

        assert!(can_modify_item(&record, a, false));
        assert!(can_modify_item(&record, a, true));
    }

    #[test]
    fn subordinate_record_needs_explicit_opt_in() {
        // Manager sees the subordinate's record but may not silently edit it.
        let (manager, subordinate) = (UserId::new(), UserId::new());
        let record = Contact { name: "report", created_by: subordinate };

        assert!(!can_modify_item(&record, manager, false));
        assert!(can_modify_item(&record, manager, true));
    }
}
