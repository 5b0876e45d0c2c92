//! Progress notification port
//!
//! Defines the interface for reporting progress during a fusion run and the
//! streamed answer that follows it.

use tutor_domain::{FusionPhase, Query};

/// Callback for progress updates during a tutor request
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bars, plain text, nothing).
pub trait ProgressNotifier: Send + Sync {
    /// Called when a phase starts
    fn on_phase_start(&self, phase: FusionPhase, total_tasks: usize);

    /// Called when one query's task completes within a phase
    fn on_query_complete(&self, phase: FusionPhase, query: &Query, success: bool);

    /// Called when a phase completes
    fn on_phase_complete(&self, phase: FusionPhase);

    // ==================== Answer Stream Callbacks ====================

    /// Called before the first answer fragment.
    fn on_answer_start(&self) {}

    /// Called for each answer fragment as it arrives.
    fn on_answer_chunk(&self, _chunk: &str) {}

    /// Called when the answer stream ends.
    fn on_answer_end(&self) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_phase_start(&self, _phase: FusionPhase, _total_tasks: usize) {}
    fn on_query_complete(&self, _phase: FusionPhase, _query: &Query, _success: bool) {}
    fn on_phase_complete(&self, _phase: FusionPhase) {}
}
