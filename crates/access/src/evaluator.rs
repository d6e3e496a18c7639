//! Permission evaluation over per-principal capability snapshots.
//!
//! This is the single canonical decision point for `(module, action)`
//! checks. Route handlers build a `PermissionMap` from the principal's
//! resolved permissions (see `meridian-infra`) and ask the functions here;
//! nothing else in the platform re-implements the matching rules.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::permissions::{actions_match, Permission, PermissionKey, CANONICAL_ACTIONS};

/// The explicit full-access marker permission.
const SYSTEM_ADMIN: (&str, &str) = ("system", "admin");

/// Privilege bundle treated as equivalent to `system:admin`.
///
/// Legacy-seeded roles predate the explicit marker and instead hold these
/// four grants; both forms must be recognized as full access. Membership is
/// exact — the alias table does not apply here.
const ADMIN_EQUIVALENT_BUNDLE: [(&str, &str); 4] = [
    ("users", "assign-role"),
    ("permissions", "assign"),
    ("roles", "create"),
    ("settings", "update"),
];

// ─────────────────────────────────────────────────────────────────────────────
// Permission Map
// ─────────────────────────────────────────────────────────────────────────────

/// A principal's capability snapshot: module → granted action set.
///
/// Built once per request from the flat permission list; grouping
/// de-duplicates repeated `(module, action)` pairs from overlapping roles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionMap {
    modules: BTreeMap<String, BTreeSet<String>>,
}

impl PermissionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group a flat permission list into module → action set.
    pub fn from_permissions<'a>(permissions: impl IntoIterator<Item = &'a Permission>) -> Self {
        let mut map = Self::new();
        for permission in permissions {
            map.grant(&permission.module, &permission.action);
        }
        map
    }

    /// Group a flat list of `(module, action)` keys into module → action set.
    pub fn from_keys(keys: impl IntoIterator<Item = PermissionKey>) -> Self {
        let mut map = Self::new();
        for key in keys {
            map.grant(&key.module, &key.action);
        }
        map
    }

    pub fn grant(&mut self, module: &str, action: &str) {
        self.modules
            .entry(module.to_string())
            .or_default()
            .insert(action.to_string());
    }

    /// Exact membership test; no alias normalization.
    pub fn contains(&self, module: &str, action: &str) -> bool {
        self.modules
            .get(module)
            .is_some_and(|actions| actions.contains(action))
    }

    /// Stored actions for a module, if any were granted.
    pub fn granted_actions(&self, module: &str) -> Option<&BTreeSet<String>> {
        self.modules.get(module)
    }

    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Evaluation
// ─────────────────────────────────────────────────────────────────────────────

/// Whether the snapshot amounts to full administrative access.
///
/// True when the explicit `system:admin` marker is present, or when the
/// complete legacy privilege bundle is. The bundle path is a migration
/// artifact kept for compatibility; taking it logs a deprecation warning so
/// deployments can be moved to the explicit marker.
pub fn is_super_admin(map: &PermissionMap) -> bool {
    if map.contains(SYSTEM_ADMIN.0, SYSTEM_ADMIN.1) {
        return true;
    }

    let bundle_complete = ADMIN_EQUIVALENT_BUNDLE
        .iter()
        .all(|(module, action)| map.contains(module, action));

    if bundle_complete {
        tracing::warn!(
            "super-admin status derived from the legacy privilege bundle; \
             grant `system:admin` explicitly instead"
        );
    }

    bundle_complete
}

/// Decide a `(module, action)` request against the snapshot.
///
/// Super-admins pass unconditionally, including for modules the catalog has
/// never seen. Everyone else needs a stored grant matching the requested
/// action exactly or through the alias table.
pub fn has_permission(map: &PermissionMap, module: &str, action: &str) -> bool {
    if is_super_admin(map) {
        return true;
    }

    match map.granted_actions(module) {
        Some(granted) => granted.iter().any(|g| actions_match(action, g.as_str())),
        None => false,
    }
}

/// Actions available to the principal on a module.
///
/// Super-admins get the full canonical vocabulary regardless of storage.
/// Everyone else gets the stored actions verbatim — no alias expansion, so
/// a grant of `read` is listed as `read` even though it satisfies `view`.
pub fn module_permissions(map: &PermissionMap, module: &str) -> Vec<String> {
    if is_super_admin(map) {
        return CANONICAL_ACTIONS.iter().map(|a| a.to_string()).collect();
    }

    map.granted_actions(module)
        .map(|actions| actions.iter().cloned().collect())
        .unwrap_or_default()
}

/// Whether the principal can enter a module at all (≥ 1 granted action).
pub fn has_module_access(map: &PermissionMap, module: &str) -> bool {
    if is_super_admin(map) {
        return true;
    }

    map.granted_actions(module)
        .is_some_and(|actions| !actions.is_empty())
}

// ─────────────────────────────────────────────────────────────────────────────
// Decision Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Detailed explanation of an access decision.
///
/// Answers "why was this request allowed/denied?" for the platform's admin
/// audit endpoints without re-running ad-hoc checks.
#[derive(Debug, Clone, Serialize)]
pub struct AccessExplanation {
    /// The module that was requested.
    pub module: String,

    /// The action that was requested.
    pub action: String,

    /// Whether access was granted.
    pub granted: bool,

    /// Human-readable reason for the decision.
    pub reason: String,

    /// The stored action that satisfied the request, when one did.
    pub matched_grant: Option<String>,

    /// Whether the super-admin short-circuit decided the request.
    pub via_super_admin: bool,

    /// If denied, what was missing.
    pub denial: Option<DenialReason>,
}

/// Detailed reason why access was denied.
#[derive(Debug, Clone, Serialize)]
pub struct DenialReason {
    pub kind: DenialKind,
    pub message: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    /// The snapshot holds no grants at all for the module.
    UnknownModule,
    /// The module is known but no stored action matches, even via alias.
    MissingAction,
}

/// Explain an access decision (or the decision that would be made).
pub fn explain_access(map: &PermissionMap, module: &str, action: &str) -> AccessExplanation {
    if is_super_admin(map) {
        let explicit = map.contains(SYSTEM_ADMIN.0, SYSTEM_ADMIN.1);
        let reason = if explicit {
            "principal holds the explicit `system:admin` marker".to_string()
        } else {
            "principal holds the complete legacy admin privilege bundle".to_string()
        };
        return AccessExplanation {
            module: module.to_string(),
            action: action.to_string(),
            granted: true,
            reason,
            matched_grant: None,
            via_super_admin: true,
            denial: None,
        };
    }

    let Some(granted) = map.granted_actions(module) else {
        return AccessExplanation {
            module: module.to_string(),
            action: action.to_string(),
            granted: false,
            reason: format!("no grants exist for module '{module}'"),
            matched_grant: None,
            via_super_admin: false,
            denial: Some(DenialReason {
                kind: DenialKind::UnknownModule,
                message: format!("principal has no access to module '{module}'"),
                suggestions: vec![format!(
                    "assign a role granting at least one '{module}' permission"
                )],
            }),
        };
    };

    match granted.iter().find(|g| actions_match(action, g.as_str())) {
        Some(grant) => {
            let reason = if grant == action {
                format!("explicit grant '{module}:{action}'")
            } else {
                format!("grant '{module}:{grant}' satisfies '{action}' via the alias table")
            };
            AccessExplanation {
                module: module.to_string(),
                action: action.to_string(),
                granted: true,
                reason,
                matched_grant: Some(grant.clone()),
                via_super_admin: false,
                denial: None,
            }
        }
        None => {
            let stored: Vec<&str> = granted.iter().map(String::as_str).collect();
            AccessExplanation {
                module: module.to_string(),
                action: action.to_string(),
                granted: false,
                reason: format!(
                    "module '{module}' grants {stored:?}, none of which satisfies '{action}'"
                ),
                matched_grant: None,
                via_super_admin: false,
                denial: Some(DenialReason {
                    kind: DenialKind::MissingAction,
                    message: format!("missing '{module}:{action}'"),
                    suggestions: vec![format!(
                        "assign a role granting '{module}:{action}' or an alias of it"
                    )],
                }),
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
