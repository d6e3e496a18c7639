//! Tracing, logging, audit (shared setup).

pub mod audit;
pub mod tracing;

pub use audit::{AccessAudit, AccessOutcome};

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}
