//! Port for structured invocation logging.
//!
//! Defines the [`InvocationLogger`] trait for recording one record per tool
//! invocation to a machine-readable log (JSONL).
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while this port captures an audit trail of
//! which tools ran, how they ended and whether the cache answered.

use serde::Serialize;

/// One completed invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationRecord {
    pub tool: String,
    /// "success" or the error kind (e.g. "NOT_FOUND")
    pub outcome: String,
    pub cache_hit: bool,
    pub duration_ms: u64,
}

/// Port for logging invocation records.
///
/// The `record` method is synchronous and non-fallible: logging failures
/// must never affect the invocation being logged.
pub trait InvocationLogger: Send + Sync {
    fn record(&self, record: &InvocationRecord);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoInvocationLogger;

impl InvocationLogger for NoInvocationLogger {
    fn record(&self, _record: &InvocationRecord) {}
}
