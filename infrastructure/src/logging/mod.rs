//! Logging infrastructure - durable per-request records.
//!
//! - [`JsonlAuditSink`]: one JSON line per fusion run, appended
//! - [`TextAuditSink`]: readable log of the latest run, overwritten each time
//! - [`FileTopicLog`]: one normalized unsupported question per line
//!
//! All writers swallow I/O errors after a `warn!` so a bad log path never
//! fails a request.

mod jsonl_audit;
mod text_audit;
mod topic_log;

pub use jsonl_audit::JsonlAuditSink;
pub use text_audit::TextAuditSink;
pub use topic_log::FileTopicLog;

use std::path::Path;
use tracing::warn;

/// Create the parent directory of `path`, logging on failure.
fn ensure_parent(path: &Path, what: &str) -> bool {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && let Err(e) = std::fs::create_dir_all(parent)
    {
        warn!(
            "Could not create {} directory {}: {}",
            what,
            parent.display(),
            e
        );
        return false;
    }
    true
}
