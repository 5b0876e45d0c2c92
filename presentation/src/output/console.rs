//! Console output formatter for tutor results

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use serde_json::json;
use tutor_application::AnswerOutput;
use tutor_domain::util::preview;
use tutor_domain::{FusionOutcome, FusionResult};

/// Ranked documents listed in full output
const RANKING_ROWS: usize = 10;
const PREVIEW_BYTES: usize = 72;

/// Formats tutor results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete result
    pub fn format(output: &AnswerOutput) -> String {
        let mut out = String::new();

        out.push_str(&Self::header("RAG Tutor"));
        out.push('\n');
        out.push_str(&Self::fusion_sections(&output.fusion));

        out.push_str(&Self::section_header("Answer"));
        out.push_str(&format!("\n{}\n", output.answer));

        out.push_str(&format!(
            "\n{} {:.2}s\n",
            "Response time:".dimmed(),
            output.elapsed.as_secs_f64()
        ));
        out.push_str(&Self::footer());
        out
    }

    /// Format as JSON
    pub fn format_json(output: &AnswerOutput) -> String {
        let value = json!({
            "question": output.fusion.question,
            "answer": output.answer,
            "elapsed_ms": output.elapsed.as_millis() as u64,
            "fusion": output.fusion,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the answer only (concise output)
    pub fn format_answer_only(output: &AnswerOutput) -> String {
        format!("{}\n", output.answer)
    }

    /// Format a fusion run: queries, ranking and the assembled context
    pub fn format_fusion(result: &FusionResult) -> String {
        let mut out = String::new();
        out.push_str(&Self::header("RAG Fusion"));
        out.push('\n');
        out.push_str(&Self::fusion_sections(result));

        out.push_str(&Self::section_header("Context"));
        if result.is_empty() {
            out.push_str(&format!("\n{}\n", "(no context retrieved)".dimmed()));
        } else {
            out.push_str(&format!("\n{}\n", result.context));
        }
        out.push_str(&Self::footer());
        out
    }

    /// Format a fusion run as JSON
    pub fn format_fusion_json(result: &FusionResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    fn fusion_sections(result: &FusionResult) -> String {
        let mut out = String::new();

        out.push_str(&format!(
            "{} {}\n",
            "Question:".cyan().bold(),
            result.question
        ));
        out.push_str(&format!(
            "{} {}\n",
            "Outcome:".cyan().bold(),
            Self::outcome_label(result.outcome)
        ));
        if let Some(error) = &result.generation_error {
            out.push_str(&format!(
                "{} {}\n",
                "Query generation failed:".yellow(),
                error
            ));
        }

        out.push_str(&Self::section_header("Queries"));
        for (i, query) in result.queries.iter().enumerate() {
            match result.failures.iter().find(|f| &f.query == query) {
                Some(failure) => out.push_str(&format!(
                    "  {} {} {}\n",
                    format!("{}.", i + 1).red(),
                    query,
                    format!("(failed: {})", failure.error).red()
                )),
                None => out.push_str(&format!("  {}. {}\n", i + 1, query)),
            }
        }

        out.push_str(&Self::section_header(&format!(
            "Fused Ranking ({} documents)",
            result.ranking.len()
        )));
        for (i, entry) in result.ranking.top(RANKING_ROWS).iter().enumerate() {
            out.push_str(&format!(
                "  {:>2}. {} {} {}\n",
                i + 1,
                format!("{:.4}", entry.score).yellow(),
                format!("[{}]", entry.document.key().short()).dimmed(),
                preview(entry.document.body(), PREVIEW_BYTES)
            ));
        }
        if result.ranking.len() > RANKING_ROWS {
            out.push_str(&format!(
                "  {}\n",
                format!("... {} more", result.ranking.len() - RANKING_ROWS).dimmed()
            ));
        }

        out
    }

    fn outcome_label(outcome: FusionOutcome) -> String {
        match outcome {
            FusionOutcome::Success => outcome.as_str().green().to_string(),
            FusionOutcome::Degraded => outcome.as_str().yellow().to_string(),
            FusionOutcome::Failed => outcome.as_str().red().to_string(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, output: &AnswerOutput) -> String {
        Self::format(output)
    }

    fn format_json(&self, output: &AnswerOutput) -> String {
        Self::format_json(output)
    }

    fn format_answer_only(&self, output: &AnswerOutput) -> String {
        Self::format_answer_only(output)
    }

    fn format_fusion(&self, result: &FusionResult) -> String {
        Self::format_fusion(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tutor_domain::{Document, Query, Question, RankedList, RetrievalFailureNote, RrfFusion};

    fn fusion() -> FusionResult {
        let lists = vec![
            RankedList::new(
                "python for loop",
                vec![Document::new("doc A"), Document::new("doc B")],
            ),
            RankedList::new("python loop examples", vec![Document::new("doc A")]),
        ];
        FusionResult {
            question: Question::new("loops in python").unwrap(),
            queries: vec![
                Query::new("python for loop"),
                Query::new("python while loop"),
                Query::new("python loop examples"),
            ],
            ranking: RrfFusion::default().fuse(&lists),
            context: "doc A\n\ndoc B".to_string(),
            failures: vec![RetrievalFailureNote::new(
                Query::new("python while loop"),
                "Query failed: index offline",
            )],
            generation_error: None,
            outcome: FusionOutcome::Success,
        }
    }

    fn output() -> AnswerOutput {
        AnswerOutput {
            answer: "Use a for loop.".to_string(),
            fusion: fusion(),
            elapsed: Duration::from_millis(1250),
        }
    }

    #[test]
    fn test_full_output_lists_queries_and_ranking() {
        colored::control::set_override(false);
        let text = ConsoleFormatter::format(&output());

        assert!(text.contains("Question: loops in python"));
        assert!(text.contains("  1. python for loop\n"));
        assert!(text.contains("2. python while loop (failed: Query failed: index offline)"));
        assert!(text.contains("Fused Ranking (2 documents)"));
        assert!(text.contains("0.4000"));
        assert!(text.contains("Use a for loop."));
        assert!(text.contains("Response time: 1.25s"));
    }

    #[test]
    fn test_answer_only() {
        assert_eq!(ConsoleFormatter::format_answer_only(&output()), "Use a for loop.\n");
    }

    #[test]
    fn test_json_output() {
        let value: serde_json::Value =
            serde_json::from_str(&ConsoleFormatter::format_json(&output())).unwrap();
        assert_eq!(value["question"], "loops in python");
        assert_eq!(value["answer"], "Use a for loop.");
        assert_eq!(value["elapsed_ms"], 1250);
        assert_eq!(value["fusion"]["context"], "doc A\n\ndoc B");
        assert_eq!(value["fusion"]["outcome"], "success");
    }

    #[test]
    fn test_fusion_only_shows_context() {
        colored::control::set_override(false);
        let text = ConsoleFormatter::format_fusion(&fusion());
        assert!(text.contains("Context\n"));
        assert!(text.contains("\ndoc A\n\ndoc B\n"));
        assert!(!text.contains("Answer"));
    }
}
