//! Human-readable fusion log, rewritten for every request.

use super::ensure_parent;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::warn;
use tutor_application::AuditSink;
use tutor_domain::AuditRecord;

/// Writes the latest run as plain text, replacing the previous contents.
pub struct TextAuditSink {
    path: PathBuf,
    instructions: String,
}

impl TextAuditSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            instructions: String::new(),
        }
    }

    /// Instructions shown in the log's prompt section.
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn render(&self, record: &AuditRecord) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "======== RAG FUSION LOG ========");
        let _ = writeln!(out, "Question:\n{}\n", record.question);
        let _ = writeln!(out, "Outcome: {}\n", record.outcome);

        let _ = writeln!(out, "-------- QUERIES GENERATED --------");
        for (i, query) in record.queries.iter().enumerate() {
            let _ = writeln!(out, "Query {}: {}", i + 1, query);
        }
        if let Some(error) = &record.generation_error {
            let _ = writeln!(out, "(query generation failed: {})", error);
        }
        for failure in &record.failures {
            let _ = writeln!(out, "(retrieval failed for '{}': {})", failure.query, failure.error);
        }
        out.push('\n');

        let _ = writeln!(out, "-------- CONTEXT RETRIEVED --------");
        let _ = writeln!(out, "{}\n", record.context.trim());
        let _ = writeln!(out, "-------- INSTRUCTIONS / PROMPT --------");
        let _ = writeln!(out, "{}\n", self.instructions.trim());
        let _ = writeln!(out, "======== END OF LOG ========");
        out
    }
}

impl AuditSink for TextAuditSink {
    fn record(&self, record: &AuditRecord) {
        if !ensure_parent(&self.path, "fusion log") {
            return;
        }
        if let Err(e) = std::fs::write(&self.path, self.render(record)) {
            warn!("Could not write fusion log {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutor_domain::{FusionOutcome, Query, Question};

    fn record(question: &str) -> AuditRecord {
        AuditRecord {
            question: Question::new(question).unwrap(),
            queries: vec![Query::new("python for loop"), Query::new("python while loop")],
            context: "doc A\n\ndoc C\n".to_string(),
            failures: Vec::new(),
            generation_error: None,
            outcome: FusionOutcome::Success,
        }
    }

    #[test]
    fn test_layout() {
        let sink = TextAuditSink::new("unused.txt").with_instructions("Be a helpful tutor.\n");
        let text = sink.render(&record("loops in python"));

        assert!(text.starts_with("======== RAG FUSION LOG ========\nQuestion:\nloops in python\n"));
        assert!(text.contains("Query 1: python for loop\nQuery 2: python while loop\n"));
        assert!(text.contains("-------- CONTEXT RETRIEVED --------\ndoc A\n\ndoc C\n\n"));
        assert!(text.contains("-------- INSTRUCTIONS / PROMPT --------\nBe a helpful tutor.\n"));
        assert!(text.ends_with("======== END OF LOG ========\n"));
    }

    #[test]
    fn test_overwrites_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rag_output.txt");
        let sink = TextAuditSink::new(&path);

        sink.record(&record("first question"));
        sink.record(&record("second question"));

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("second question"));
        assert!(!text.contains("first question"));
    }

    #[test]
    fn test_degraded_run_notes_failure() {
        let sink = TextAuditSink::new("unused.txt");
        let mut degraded = record("loops in python");
        degraded.outcome = FusionOutcome::Degraded;
        degraded.generation_error = Some("connection refused".to_string());

        let text = sink.render(&degraded);
        assert!(text.contains("Outcome: degraded"));
        assert!(text.contains("(query generation failed: connection refused)"));
    }
}
