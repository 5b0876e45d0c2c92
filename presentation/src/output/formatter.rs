//! Output formatter trait

use tutor_application::AnswerOutput;
use tutor_domain::FusionResult;

/// Trait for formatting tutor results
pub trait OutputFormatter {
    /// Format the complete result: queries, ranking, answer, timing
    fn format(&self, output: &AnswerOutput) -> String;

    /// Format as JSON
    fn format_json(&self, output: &AnswerOutput) -> String;

    /// Format the answer only (concise output)
    fn format_answer_only(&self, output: &AnswerOutput) -> String;

    /// Format a fusion run without an answer
    fn format_fusion(&self, result: &FusionResult) -> String;
}
