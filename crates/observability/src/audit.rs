//! Structured audit records for access decisions.
//!
//! Every grant, denial and degraded evaluation is auditable with enough
//! context to answer "who asked for what, and what happened": principal id,
//! module, action, outcome.

use serde::Serialize;

use meridian_core::UserId;

/// Outcome recorded for an access-decision audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessOutcome {
    Granted,
    Denied,
    /// The decision was made on degraded state: the store could not be
    /// read, so the evaluator denied or visibility was restricted to self.
    Degraded,
}

/// One access decision, as the audit log sees it.
#[derive(Debug, Clone, Serialize)]
pub struct AccessAudit {
    pub user_id: UserId,
    pub module: String,
    pub action: String,
    pub outcome: AccessOutcome,
    /// Free-form context: matched grant, alias taken, upstream error.
    pub detail: Option<String>,
}

impl AccessAudit {
    pub fn granted(user_id: UserId, module: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            user_id,
            module: module.into(),
            action: action.into(),
            outcome: AccessOutcome::Granted,
            detail: None,
        }
    }

    pub fn denied(user_id: UserId, module: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            user_id,
            module: module.into(),
            action: action.into(),
            outcome: AccessOutcome::Denied,
            detail: None,
        }
    }

    pub fn degraded(
        user_id: UserId,
        module: impl Into<String>,
        action: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            module: module.into(),
            action: action.into(),
            outcome: AccessOutcome::Degraded,
            detail: Some(detail.into()),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Emit through `tracing` at a level matching the outcome. Degraded
    /// decisions warn so operators see them without raising the filter.
    pub fn emit(&self) {
        let detail = self.detail.as_deref().unwrap_or("");
        match self.outcome {
            AccessOutcome::Granted => tracing::info!(
                user_id = %self.user_id,
                module = %self.module,
                action = %self.action,
                detail,
                "access granted"
            ),
            AccessOutcome::Denied => tracing::info!(
                user_id = %self.user_id,
                module = %self.module,
                action = %self.action,
                detail,
                "access denied"
            ),
            AccessOutcome::Degraded => tracing::warn!(
                user_id = %self.user_id,
                module = %self.module,
                action = %self.action,
                detail,
                "access decision degraded"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_outcomes() {
        let user = UserId::new();
        assert_eq!(
            AccessAudit::granted(user, "sales", "read").outcome,
            AccessOutcome::Granted
        );
        assert_eq!(
            AccessAudit::denied(user, "sales", "delete").outcome,
            AccessOutcome::Denied
        );

        let degraded = AccessAudit::degraded(user, "sales", "read", "engine offline");
        assert_eq!(degraded.outcome, AccessOutcome::Degraded);
        assert_eq!(degraded.detail.as_deref(), Some("engine offline"));
    }

    #[test]
    fn serializes_with_snake_case_outcome() {
        let record = AccessAudit::granted(UserId::new(), "sales", "read")
            .with_detail("explicit grant");
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["outcome"], "granted");
        assert_eq!(value["detail"], "explicit grant");
        assert_eq!(value["module"], "sales");
    }
}
