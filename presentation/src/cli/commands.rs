//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for tutor results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Queries, ranking, answer and timing
    Full,
    /// Only the answer text
    Answer,
    /// JSON output
    Json,
}

impl From<OutputFormat> for tutor_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => tutor_domain::OutputFormat::Full,
            OutputFormat::Answer => tutor_domain::OutputFormat::Answer,
            OutputFormat::Json => tutor_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for rag-tutor
#[derive(Parser, Debug)]
#[command(name = "rag-tutor")]
#[command(author, version, about = "Coding tutor answering from a snippet index with RAG Fusion")]
#[command(long_about = r#"
rag-tutor answers programming questions using only the tutorial snippets in
its index.

Each question goes through four steps:
1. Diversify: the model rewrites the question into several short queries
2. Retrieve: every query searches the snippet index concurrently
3. Fuse: the ranked lists are merged with Reciprocal Rank Fusion
4. Answer: the top snippets become the context for the tutor's answer

Configuration files are loaded from (in priority order):
1. TUTOR_* environment variables (e.g. TUTOR_FUSION__TOP_K=10)
2. --config <path>     Explicit config file
3. ./tutor.toml        Project-level config
4. ~/.config/rag-tutor/config.toml   Global config

Example:
  rag-tutor "How do loops work in Python?"
  rag-tutor --context-only -o json "list comprehension"
  rag-tutor --history "user: what is a list?" "how do I sort one?"
"#)]
pub struct Cli {
    /// The question to ask
    pub question: Option<String>,

    /// Run retrieval fusion only and print the queries and context
    #[arg(long)]
    pub context_only: bool,

    /// Output format (defaults to the config file, then `answer`)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Prior conversation passed to the tutor as plain text
    #[arg(long, value_name = "TEXT")]
    pub history: Option<String>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_question_and_flags() {
        let cli = Cli::try_parse_from([
            "rag-tutor",
            "-vv",
            "--context-only",
            "-o",
            "json",
            "loops in python",
        ])
        .unwrap();
        assert_eq!(cli.question.as_deref(), Some("loops in python"));
        assert!(cli.context_only);
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_output_defaults_to_unset() {
        let cli = Cli::try_parse_from(["rag-tutor", "q"]).unwrap();
        assert_eq!(cli.output, None);
        assert!(cli.history.is_none());
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["rag-tutor", "-o", "synthesis", "q"]).is_err());
    }
}
