//! Port for durable audit records.
//!
//! Every fusion run ends by handing an [`AuditRecord`] to an [`AuditSink`].
//! This is separate from `tracing`-based operation logs: tracing handles
//! diagnostic messages, while the sink keeps one record per request.

use tutor_domain::AuditRecord;

/// Port for recording fusion runs.
///
/// The `record` method is synchronous and non-fallible: a sink that cannot
/// write logs the problem itself and the request carries on.
pub trait AuditSink: Send + Sync {
    /// Record one finished run.
    fn record(&self, record: &AuditRecord);
}

/// No-op implementation for tests and when auditing is disabled.
pub struct NoAuditSink;

impl AuditSink for NoAuditSink {
    fn record(&self, _record: &AuditRecord) {}
}
