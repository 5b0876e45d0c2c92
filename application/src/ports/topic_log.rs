//! Port for recording questions the tutor could not cover.

use tutor_domain::Question;

/// Records questions answered with the unsupported-topic reply.
///
/// Synchronous and non-fallible, like [`AuditSink`](super::audit_sink::AuditSink).
pub trait TopicLog: Send + Sync {
    fn record_unsupported(&self, question: &Question);
}

/// No-op implementation for tests and when the log is disabled.
pub struct NoTopicLog;

impl TopicLog for NoTopicLog {
    fn record_unsupported(&self, _question: &Question) {}
}
