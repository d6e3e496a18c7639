//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// duplicates, dangling references). Degradation policy for store outages
/// and corrupt hierarchy data lives with the components in `meridian-infra`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. blank module or action).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A referenced resource (role, permission, user) does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A unique key is already taken (e.g. a `(module, action)` pair).
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Stored data violates a structural invariant (e.g. a cyclic
    /// manager-link chain). Traversals resolve this defensively and keep
    /// going; the variant carries context for audit logs.
    #[error("data integrity fault: {0}")]
    IntegrityFault(String),

    /// The underlying store could not serve the request.
    #[error("upstream store failure: {0}")]
    Upstream(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn already_exists(msg: impl Into<String>) -> Self {
        Self::AlreadyExists(msg.into())
    }

    pub fn integrity(msg: impl Into<String>) -> Self {
        Self::IntegrityFault(msg.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }
}
