//! Organizational hierarchy traversal.
//!
//! Manager links form a forest, but the traversal assumes nothing: corrupt
//! data containing cycles must still terminate with a finite, best-effort
//! result rather than raise.

use std::collections::{HashSet, VecDeque};

use meridian_core::UserId;

use crate::principal::Principal;

/// Transitive subordinates of `root`, breadth-first over direct reports.
///
/// `direct_reports` supplies the principals whose `manager_id` equals the
/// queried id. The visited set (pre-seeded with `root`) stops re-expansion
/// of any principal already seen, so even a cyclic manager chain terminates.
/// `root` itself is never part of the result.
pub fn subordinate_closure<F>(root: UserId, mut direct_reports: F) -> Vec<Principal>
where
    F: FnMut(UserId) -> Vec<Principal>,
{
    let mut visited: HashSet<UserId> = HashSet::from([root]);
    let mut queue: VecDeque<UserId> = VecDeque::from([root]);
    let mut closure = Vec::new();

    while let Some(current) = queue.pop_front() {
        for report in direct_reports(current) {
            if !visited.insert(report.id) {
                tracing::warn!(
                    principal_id = %report.id,
                    manager_id = %current,
                    "cyclic manager link in subordinate traversal"
                );
                continue;
            }
            queue.push_back(report.id);
            closure.push(report);
        }
    }

    closure
}

/// `root` plus the ids of every transitive subordinate.
///
/// The visited set inside the closure already de-duplicates, including the
/// pathological case where corruption makes `root` somebody's report.
pub fn accessible_user_ids<F>(root: UserId, direct_reports: F) -> Vec<UserId>
where
    F: FnMut(UserId) -> Vec<Principal>,
{
    let mut ids = vec![root];
    ids.extend(
        subordinate_closure(root, direct_reports)
            .into_iter()
            .map(|p| p.id),
    );
    ids
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
