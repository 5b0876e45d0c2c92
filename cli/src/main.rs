//! CLI entrypoint for rag-tutor
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};
use tutor_application::{
    AnswerQuestionInput, AnswerQuestionUseCase, AuditSink, LlmGateway, NoAuditSink, NoProgress,
    NoTopicLog, ProgressNotifier, Retriever, RunFusionUseCase, TopicLog,
};
use tutor_domain::{OutputFormat, PromptTemplate, Question};
use tutor_infrastructure::{
    AuditFormat, ConfigLoader, EmbeddingRetriever, FileConfig, FileTopicLog, JsonlAuditSink,
    LexicalRetriever, OpenAiCompatGateway, OpenAiEmbedder, RetrieverKind, SamplingParams,
    SnippetIndex, TextAuditSink,
};
use tutor_presentation::{Cli, ConsoleFormatter, ProgressReporter, SimpleProgress};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?
    };

    if cli.show_config {
        ConfigLoader::print_config_sources();
        println!("\nEffective configuration:\n");
        println!("{}", ConfigLoader::to_toml(&config)?);
        return Ok(());
    }

    let _log_guard = init_logging(cli.verbose, config.logging.dir.as_ref());

    config.validate().context("Invalid configuration")?;
    info!("Starting rag-tutor");

    if !config.output.color {
        colored::control::set_override(false);
    }

    let question = match cli.question.as_deref() {
        Some(q) => Question::new(q)?,
        None => bail!("Question is required."),
    };

    // === Dependency Injection ===
    let gateway: Arc<dyn LlmGateway> = Arc::new(build_gateway(&config)?);
    let retriever = build_retriever(&config)?;
    let audit_sink = build_audit_sink(&config);
    let topic_log: Arc<dyn TopicLog> = match &config.topics.unsupported_log {
        Some(path) => Arc::new(FileTopicLog::new(path)),
        None => Arc::new(NoTopicLog),
    };

    let cancellation = CancellationToken::new();
    {
        let token = cancellation.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling");
                token.cancel();
            }
        });
    }

    let fusion = RunFusionUseCase::new(gateway.clone(), retriever, config.fusion_params())?
        .with_audit_sink(audit_sink);

    let format = config.output.resolve_format(cli.output.map(Into::into));

    let progress: Box<dyn ProgressNotifier> = if cli.quiet || !format.allows_progress() {
        Box::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };

    if cli.context_only {
        let fusion = fusion.with_cancellation(cancellation);
        let result = match fusion.execute_with_progress(&question, progress.as_ref()).await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => {
                eprintln!("Cancelled.");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let output = match format {
            OutputFormat::Json => ConsoleFormatter::format_fusion_json(&result),
            OutputFormat::Full => ConsoleFormatter::format_fusion(&result),
            OutputFormat::Answer => result.context.clone(),
        };
        println!("{}", output);
        return Ok(());
    }

    let use_case = AnswerQuestionUseCase::new(gateway, fusion)
        .with_topic_log(topic_log)
        .with_timeout(Some(Duration::from_secs(config.llm.timeout_seconds)))
        .with_cancellation(cancellation);

    let mut input = AnswerQuestionInput::new(question);
    if let Some(history) = cli.history {
        input = input.with_history(history);
    }

    let answer = match use_case.execute_with_progress(input, progress.as_ref()).await {
        Ok(answer) => answer,
        Err(e) if e.is_cancelled() => {
            eprintln!("Cancelled.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let output = match format {
        OutputFormat::Full => ConsoleFormatter::format(&answer),
        OutputFormat::Answer => ConsoleFormatter::format_answer_only(&answer),
        OutputFormat::Json => ConsoleFormatter::format_json(&answer),
    };
    print!("{}", output);
    if format == OutputFormat::Json {
        println!();
    }

    Ok(())
}

/// Initialize logging based on verbosity level (`RUST_LOG` wins), plus an optional daily log file.
fn init_logging(verbose: u8, log_dir: Option<&PathBuf>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "rag-tutor.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(EnvFilter::new("info"));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}

fn build_gateway(config: &FileConfig) -> Result<OpenAiCompatGateway> {
    let llm = &config.llm;
    let api_key = llm.api_key();
    if api_key.is_none() {
        warn!(
            "{} is not set; sending requests without an API key",
            llm.api_key_env
        );
    }

    let gateway = OpenAiCompatGateway::new(
        &llm.base_url,
        &llm.model,
        api_key,
        Duration::from_secs(llm.timeout_seconds),
    )?
    .with_sampling(SamplingParams {
        temperature: llm.temperature,
        top_p: llm.top_p,
        max_tokens: llm.max_tokens,
    });
    Ok(gateway)
}

fn build_retriever(config: &FileConfig) -> Result<Arc<dyn Retriever>> {
    let index = Arc::new(SnippetIndex::load(&config.index.path)?);

    let retriever: Arc<dyn Retriever> = match config.index.retriever {
        RetrieverKind::Lexical => Arc::new(LexicalRetriever::new(index)),
        RetrieverKind::Embedding => {
            let base_url = config
                .index
                .embedding_base_url
                .as_deref()
                .unwrap_or(&config.llm.base_url);
            let embedder = OpenAiEmbedder::new(
                base_url,
                &config.index.embedding_model,
                config.llm.api_key(),
                Duration::from_secs(config.llm.timeout_seconds),
            )?;
            Arc::new(EmbeddingRetriever::new(index, Arc::new(embedder))?)
        }
    };
    info!("Using {} retriever", config.index.retriever);
    Ok(retriever)
}

fn build_audit_sink(config: &FileConfig) -> Arc<dyn AuditSink> {
    let audit = &config.audit;
    if !audit.enabled {
        return Arc::new(NoAuditSink);
    }

    match audit.format {
        AuditFormat::Jsonl => {
            let path = audit
                .path
                .clone()
                .unwrap_or_else(|| ConfigLoader::data_dir().join("fusion_audit.jsonl"));
            match JsonlAuditSink::new(&path) {
                Some(sink) => Arc::new(sink),
                None => Arc::new(NoAuditSink),
            }
        }
        AuditFormat::Text => {
            let path = audit
                .path
                .clone()
                .unwrap_or_else(|| PathBuf::from("rag_output.txt"));
            Arc::new(TextAuditSink::new(path).with_instructions(PromptTemplate::tutor_instructions()))
        }
    }
}
