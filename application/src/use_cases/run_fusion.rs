//! Run Fusion use case (fusion orchestrator).
//!
//! Sequences one request-scoped fusion run:
//!
//! 1. **Diversify**: ask the backend for `query_count` queries; on failure
//!    fall back to the question itself as the only query
//! 2. **Retrieve**: one retriever call per query, run concurrently; a
//!    failing query is recorded and contributes no list
//! 3. **Fuse**: Reciprocal Rank Fusion over the surviving lists, fed in
//!    query order regardless of completion order
//! 4. **Assemble**: join the top-K bodies into the context window
//! 5. **Audit**: hand the run's [`AuditRecord`] to the audit sink
//!
//! Only a run where diversification failed *and* no fallback retrieval
//! succeeded is an error ([`RunFusionError::TotalFailure`]). An empty context
//! is a normal result.

use crate::config::FusionParams;
use crate::ports::audit_sink::{AuditSink, NoAuditSink};
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::retriever::{RetrievalError, Retriever};
use crate::use_cases::generate_queries::{GenerateQueriesUseCase, GenerationError};
use crate::use_cases::shared::{bounded, is_cancelled};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tutor_domain::{
    AuditRecord, DomainError, FusionOutcome, FusionPhase, FusionResult, Query, Question,
    RankedList, RetrievalFailureNote, RrfFusion, assemble_context,
};

/// Errors that can end a fusion run
#[derive(Error, Debug)]
pub enum RunFusionError {
    #[error("Query generation failed ({generation}) and fallback retrieval failed ({retrieval})")]
    TotalFailure {
        generation: String,
        retrieval: String,
    },

    #[error("Invalid fusion parameters: {0}")]
    InvalidParams(#[from] DomainError),

    #[error("Operation cancelled")]
    Cancelled,
}

impl RunFusionError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunFusionError::Cancelled)
    }
}

/// Use case for running the retrieval fusion pipeline
pub struct RunFusionUseCase {
    diversifier: GenerateQueriesUseCase,
    retriever: Arc<dyn Retriever>,
    audit_sink: Arc<dyn AuditSink>,
    params: FusionParams,
    fusion: RrfFusion,
    cancellation_token: Option<CancellationToken>,
}

impl Clone for RunFusionUseCase {
    fn clone(&self) -> Self {
        Self {
            diversifier: self.diversifier.clone(),
            retriever: self.retriever.clone(),
            audit_sink: self.audit_sink.clone(),
            params: self.params.clone(),
            fusion: self.fusion,
            cancellation_token: self.cancellation_token.clone(),
        }
    }
}

/// Slot for one query's retrieval outcome, indexed by query position.
type RetrievalSlot = Option<Result<Vec<tutor_domain::Document>, RetrievalError>>;

impl RunFusionUseCase {
    /// Build an orchestrator with its own tuning.
    ///
    /// Fails if the parameters are invalid (zero counts, non-positive damping).
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        retriever: Arc<dyn Retriever>,
        params: FusionParams,
    ) -> Result<Self, RunFusionError> {
        let fusion = params.fusion()?;
        let diversifier =
            GenerateQueriesUseCase::new(gateway).with_timeout(params.generation_timeout);
        Ok(Self {
            diversifier,
            retriever,
            audit_sink: Arc::new(NoAuditSink),
            params,
            fusion,
            cancellation_token: None,
        })
    }

    pub fn with_audit_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit_sink = sink;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub fn params(&self) -> &FusionParams {
        &self.params
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, question: &Question) -> Result<FusionResult, RunFusionError> {
        self.execute_with_progress(question, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        question: &Question,
        progress: &dyn ProgressNotifier,
    ) -> Result<FusionResult, RunFusionError> {
        info!("Starting fusion run for: {}", question);

        // Phase 1: Diversify
        let (queries, generation_error) = self.phase_diversify(question, progress).await?;

        // Phase 2: Retrieve
        let (lists, failures) = self.phase_retrieve(&queries, progress).await?;

        if generation_error.is_some() && lists.is_empty() {
            let generation = generation_error.unwrap_or_default();
            let retrieval = failures
                .iter()
                .map(|f| f.error.clone())
                .collect::<Vec<_>>()
                .join("; ");
            warn!(
                "Total failure: generation ({}) and fallback retrieval ({})",
                generation, retrieval
            );
            self.audit_sink.record(&AuditRecord::failed(
                question.clone(),
                queries,
                failures,
                Some(generation.clone()),
            ));
            return Err(RunFusionError::TotalFailure {
                generation,
                retrieval,
            });
        }

        // Phase 3: Fuse
        progress.on_phase_start(FusionPhase::Fuse, lists.len());
        let ranking = self.fusion.fuse(&lists);
        debug!(
            "Fused {} lists into {} unique documents",
            lists.len(),
            ranking.len()
        );
        progress.on_phase_complete(FusionPhase::Fuse);

        // Phase 4: Assemble
        progress.on_phase_start(FusionPhase::Assemble, 1);
        let context = assemble_context(&ranking, self.params.top_k);
        progress.on_phase_complete(FusionPhase::Assemble);

        let outcome = if generation_error.is_some() {
            FusionOutcome::Degraded
        } else {
            FusionOutcome::Success
        };

        let result = FusionResult {
            question: question.clone(),
            queries,
            ranking,
            context,
            failures,
            generation_error,
            outcome,
        };

        // Phase 5: Audit
        self.audit_sink.record(&result.audit_record());

        info!(
            "Fusion run {}: {} queries, {} failed, {} documents, {} context bytes",
            result.outcome,
            result.queries.len(),
            result.failures.len(),
            result.ranking.len(),
            result.context.len()
        );
        Ok(result)
    }

    /// Phase 1: produce the query list, falling back to the question itself.
    ///
    /// Returns the queries and, when degraded, why diversification failed.
    async fn phase_diversify(
        &self,
        question: &Question,
        progress: &dyn ProgressNotifier,
    ) -> Result<(Vec<Query>, Option<String>), RunFusionError> {
        info!("Phase 1: Diversify");
        progress.on_phase_start(FusionPhase::Diversify, 1);

        let count = self.params.query_count;
        let generation = async {
            if self.params.include_hyde {
                let (q, h) = tokio::join!(
                    self.diversifier.execute(question, count),
                    self.diversifier.hyde_document(question)
                );
                (q, Some(h))
            } else {
                (self.diversifier.execute(question, count).await, None)
            }
        };

        let (diversified, hyde) = if let Some(ref token) = self.cancellation_token {
            tokio::select! {
                biased;
                _ = token.cancelled() => return Err(RunFusionError::Cancelled),
                generated = generation => generated,
            }
        } else {
            generation.await
        };

        if is_cancelled(&self.cancellation_token) {
            return Err(RunFusionError::Cancelled);
        }

        let fallback = Query::new(question.content());
        let (mut queries, generation_error) = match diversified {
            Ok(queries) if !queries.is_empty() => {
                info!("Generated queries: {:?}", queries);
                progress.on_query_complete(FusionPhase::Diversify, &fallback, true);
                (queries, None)
            }
            Ok(_) => {
                warn!("Query generation returned no usable lines, using the question as the only query");
                progress.on_query_complete(FusionPhase::Diversify, &fallback, false);
                (vec![fallback], Some("no queries in backend output".to_string()))
            }
            Err(e) => {
                warn!("Query generation failed, using the question as the only query: {}", e);
                progress.on_query_complete(FusionPhase::Diversify, &fallback, false);
                (vec![fallback], Some(e.to_string()))
            }
        };

        // The fallback stays the question alone
        let hyde = match hyde {
            Some(_) if generation_error.is_some() => {
                debug!("Query generation degraded, not adding the HyDE document");
                None
            }
            other => other,
        };

        match hyde {
            Some(Ok(text)) if !text.is_empty() => {
                debug!("Adding HyDE document ({} bytes) as a query", text.len());
                queries.push(Query::new(text));
            }
            Some(Ok(_)) => debug!("HyDE document was empty, skipping"),
            Some(Err(GenerationError::Timeout(limit))) => {
                warn!("HyDE generation timed out after {:?}, skipping", limit)
            }
            Some(Err(e)) => warn!("HyDE generation failed, skipping: {}", e),
            None => {}
        }

        progress.on_phase_complete(FusionPhase::Diversify);
        Ok((queries, generation_error))
    }

    /// Phase 2: retrieve every query concurrently, re-joined in query order.
    async fn phase_retrieve(
        &self,
        queries: &[Query],
        progress: &dyn ProgressNotifier,
    ) -> Result<(Vec<RankedList>, Vec<RetrievalFailureNote>), RunFusionError> {
        info!("Phase 2: Retrieve ({} queries)", queries.len());
        progress.on_phase_start(FusionPhase::Retrieve, queries.len());

        let mut join_set = JoinSet::new();

        for (index, query) in queries.iter().enumerate() {
            let retriever = Arc::clone(&self.retriever);
            let text = query.text().to_string();
            let k = self.params.fanout_width;
            let timeout = self.params.retrieval_timeout;

            join_set.spawn(async move {
                let result =
                    bounded(timeout, retriever.retrieve(&text, k), RetrievalError::Timeout).await;
                (index, result)
            });
        }

        let mut slots: Vec<RetrievalSlot> = vec![None; queries.len()];

        loop {
            let joined = if let Some(ref token) = self.cancellation_token {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        join_set.abort_all();
                        return Err(RunFusionError::Cancelled);
                    }
                    joined = join_set.join_next() => joined,
                }
            } else {
                join_set.join_next().await
            };

            let Some(joined) = joined else {
                break;
            };

            match joined {
                Ok((index, result)) => {
                    let query = &queries[index];
                    match &result {
                        Ok(docs) => {
                            debug!("Query '{}' retrieved {} documents", query, docs.len());
                            progress.on_query_complete(FusionPhase::Retrieve, query, true);
                        }
                        Err(e) => {
                            warn!("Retrieval error for '{}': {}", query, e);
                            progress.on_query_complete(FusionPhase::Retrieve, query, false);
                        }
                    }
                    slots[index] = Some(result);
                }
                Err(e) => {
                    warn!("Retrieval task join error: {}", e);
                }
            }
        }

        let mut lists = Vec::new();
        let mut failures = Vec::new();
        for (query, slot) in queries.iter().zip(slots) {
            match slot {
                Some(Ok(documents)) => lists.push(RankedList::new(query.clone(), documents)),
                Some(Err(e)) => failures.push(RetrievalFailureNote::new(query.clone(), e.to_string())),
                None => failures.push(RetrievalFailureNote::new(
                    query.clone(),
                    "retrieval task did not complete",
                )),
            }
        }

        progress.on_phase_complete(FusionPhase::Retrieve);
        Ok((lists, failures))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{FixtureRetriever, MockGateway, RecordingAuditSink};
    use std::time::Duration;
    use tutor_domain::CONTEXT_DELIMITER;

    const LOOP_QUERIES: &str =
        "python for loop\npython while loop\npython loop examples\niterating in python";

    fn question() -> Question {
        Question::new("loops in python").unwrap()
    }

    /// Fixture index for "loops in python": every query retrieves three
    /// documents with known overlaps.
    fn loop_fixture() -> FixtureRetriever {
        FixtureRetriever::new()
            .with("python for loop", &["doc A", "doc B", "doc C"])
            .with("python while loop", &["doc D", "doc A", "doc E"])
            .with("python loop examples", &["doc A", "doc C", "doc D"])
            .with("iterating in python", &["doc B", "doc C", "doc F"])
    }

    fn use_case(
        gateway: MockGateway,
        retriever: FixtureRetriever,
        params: FusionParams,
    ) -> (RunFusionUseCase, Arc<RecordingAuditSink>, Arc<FixtureRetriever>) {
        let sink = Arc::new(RecordingAuditSink::default());
        let retriever = Arc::new(retriever);
        let use_case = RunFusionUseCase::new(Arc::new(gateway), retriever.clone(), params)
            .unwrap()
            .with_audit_sink(sink.clone());
        (use_case, sink, retriever)
    }

    fn bodies(result: &FusionResult) -> Vec<&str> {
        result.ranking.iter().map(|e| e.document.body()).collect()
    }

    #[tokio::test]
    async fn test_end_to_end_loops_in_python() {
        let (uc, sink, retriever) = use_case(
            MockGateway::with_queries(LOOP_QUERIES),
            loop_fixture(),
            FusionParams::default().with_fanout_width(3).with_top_k(3),
        );

        let result = uc.execute(&question()).await.unwrap();

        assert_eq!(result.outcome, FusionOutcome::Success);
        assert_eq!(result.queries.len(), 4);
        assert!(result.failures.is_empty());

        // A: 1/5 + 1/6 + 1/5   C: 1/7 + 1/6 + 1/6   B: 1/6 + 1/5
        // D: 1/5 + 1/7         E: 1/7               F: 1/7 (E seen first)
        assert_eq!(
            bodies(&result),
            vec!["doc A", "doc C", "doc B", "doc D", "doc E", "doc F"]
        );
        let scores: Vec<u64> = result.ranking.iter().map(|e| e.score.to_bits()).collect();
        let expected: Vec<u64> = [
            1.0 / 5.0 + 1.0 / 6.0 + 1.0 / 5.0,
            1.0 / 7.0 + 1.0 / 6.0 + 1.0 / 6.0,
            1.0 / 6.0 + 1.0 / 5.0,
            1.0 / 5.0 + 1.0 / 7.0,
            1.0 / 7.0,
            1.0 / 7.0,
        ]
        .iter()
        .map(|s: &f64| s.to_bits())
        .collect();
        assert_eq!(scores, expected);

        assert_eq!(result.context, "doc A\n\ndoc C\n\ndoc B");

        // Retriever asked for fan-out width, not top_k or the damping constant.
        assert!(retriever.calls.lock().unwrap().iter().all(|(_, k)| *k == 3));

        let records = sink.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].context, result.context);
        assert_eq!(records[0].queries, result.queries);
        assert_eq!(records[0].outcome, FusionOutcome::Success);
    }

    #[tokio::test]
    async fn test_partial_retrieval_failure_tolerated() {
        let retriever = FixtureRetriever::new()
            .with("python for loop", &["doc A", "doc B", "doc C"])
            .failing("python while loop", "collection missing")
            .with("python loop examples", &["doc A", "doc C", "doc D"])
            .with("iterating in python", &["doc B", "doc C", "doc F"]);
        let (uc, sink, _) = use_case(
            MockGateway::with_queries(LOOP_QUERIES),
            retriever,
            FusionParams::default(),
        );

        let result = uc.execute(&question()).await.unwrap();

        assert_eq!(result.outcome, FusionOutcome::Success);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].query.text(), "python while loop");
        assert!(result.failures[0].error.contains("collection missing"));
        assert_eq!(result.succeeded_queries(), 3);

        // Fused from the three surviving lists only.
        // C: 1/7 + 1/6 + 1/6   A: 1/5 + 1/5   B: 1/6 + 1/5   D: 1/7   F: 1/7 (D seen first)
        assert_eq!(bodies(&result), vec!["doc C", "doc A", "doc B", "doc D", "doc F"]);
        let scores: Vec<u64> = result.ranking.iter().map(|e| e.score.to_bits()).collect();
        let expected: Vec<u64> = [
            1.0 / 7.0 + 1.0 / 6.0 + 1.0 / 6.0,
            1.0 / 5.0 + 1.0 / 5.0,
            1.0 / 6.0 + 1.0 / 5.0,
            1.0 / 7.0,
            1.0 / 7.0,
        ]
        .iter()
        .map(|s: &f64| s.to_bits())
        .collect();
        assert_eq!(scores, expected);
        assert!(!bodies(&result).contains(&"doc E"));

        let records = sink.records.lock().unwrap();
        assert_eq!(records[0].failures.len(), 1);
    }

    #[tokio::test]
    async fn test_everything_empty_gives_empty_context() {
        let (uc, sink, _) = use_case(
            MockGateway::with_queries(LOOP_QUERIES),
            FixtureRetriever::new(),
            FusionParams::default(),
        );

        let result = uc.execute(&question()).await.unwrap();

        assert_eq!(result.context, "");
        assert!(result.ranking.is_empty());
        assert!(result.is_empty());
        assert_eq!(result.outcome, FusionOutcome::Success);
        assert_eq!(sink.records.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_all_retrievals_fail_is_not_an_error() {
        let retriever = FixtureRetriever::new()
            .failing("python for loop", "down")
            .failing("python while loop", "down")
            .failing("python loop examples", "down")
            .failing("iterating in python", "down");
        let (uc, _, _) = use_case(
            MockGateway::with_queries(LOOP_QUERIES),
            retriever,
            FusionParams::default(),
        );

        let result = uc.execute(&question()).await.unwrap();
        assert_eq!(result.context, "");
        assert_eq!(result.failures.len(), 4);
    }

    #[tokio::test]
    async fn test_diversifier_failure_falls_back_to_question() {
        let retriever = FixtureRetriever::new().with("loops in python", &["doc A", "doc B"]);
        let (uc, sink, retriever) = use_case(
            MockGateway::failing("backend unreachable"),
            retriever,
            FusionParams::default(),
        );

        let result = uc.execute(&question()).await.unwrap();

        assert_eq!(result.outcome, FusionOutcome::Degraded);
        assert!(result.is_degraded());
        assert_eq!(result.queries, vec![Query::new("loops in python")]);
        assert_eq!(retriever.queried(), vec!["loops in python".to_string()]);
        assert_eq!(result.context, "doc A\n\ndoc B");
        assert!(result.generation_error.as_deref().unwrap().contains("backend unreachable"));

        assert_eq!(sink.records.lock().unwrap()[0].outcome, FusionOutcome::Degraded);
    }

    #[tokio::test]
    async fn test_degraded_with_empty_retrieval_is_not_failure() {
        let (uc, _, _) = use_case(
            MockGateway::failing("backend unreachable"),
            FixtureRetriever::new(),
            FusionParams::default(),
        );

        let result = uc.execute(&question()).await.unwrap();
        assert_eq!(result.outcome, FusionOutcome::Degraded);
        assert_eq!(result.context, "");
    }

    #[tokio::test]
    async fn test_total_failure() {
        let retriever = FixtureRetriever::new().failing("loops in python", "index offline");
        let (uc, sink, _) = use_case(
            MockGateway::failing("backend unreachable"),
            retriever,
            FusionParams::default(),
        );

        let err = uc.execute(&question()).await.unwrap_err();
        match err {
            RunFusionError::TotalFailure {
                generation,
                retrieval,
            } => {
                assert!(generation.contains("backend unreachable"));
                assert!(retrieval.contains("index offline"));
            }
            other => panic!("Expected TotalFailure, got {:?}", other),
        }

        // The failed run is still audited.
        let records = sink.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].outcome, FusionOutcome::Failed);
    }

    #[tokio::test]
    async fn test_blank_diversifier_output_falls_back() {
        let retriever = FixtureRetriever::new().with("loops in python", &["doc A"]);
        let (uc, _, _) = use_case(MockGateway::with_queries("\n \n"), retriever, FusionParams::default());

        let result = uc.execute(&question()).await.unwrap();
        assert_eq!(result.outcome, FusionOutcome::Degraded);
        assert_eq!(result.context, "doc A");
    }

    #[tokio::test]
    async fn test_completion_order_does_not_change_ranking() {
        let params = FusionParams::default().with_fanout_width(3);

        let (sequential, _, _) = use_case(
            MockGateway::with_queries(LOOP_QUERIES),
            loop_fixture(),
            params.clone(),
        );
        // First query finishes last, last query finishes first.
        let (reordered, _, _) = use_case(
            MockGateway::with_queries(LOOP_QUERIES),
            loop_fixture()
                .delay("python for loop", Duration::from_millis(60))
                .delay("python while loop", Duration::from_millis(40))
                .delay("python loop examples", Duration::from_millis(20)),
            params,
        );

        let a = sequential.execute(&question()).await.unwrap();
        let b = reordered.execute(&question()).await.unwrap();

        assert_eq!(bodies(&a), bodies(&b));
        let sa: Vec<u64> = a.ranking.iter().map(|e| e.score.to_bits()).collect();
        let sb: Vec<u64> = b.ranking.iter().map(|e| e.score.to_bits()).collect();
        assert_eq!(sa, sb);
        assert_eq!(a.context, b.context);
    }

    #[tokio::test]
    async fn test_slow_query_times_out_without_stalling() {
        let retriever = loop_fixture().delay("python while loop", Duration::from_secs(10));
        let (uc, _, _) = use_case(
            MockGateway::with_queries(LOOP_QUERIES),
            retriever,
            FusionParams::default().with_retrieval_timeout(Some(Duration::from_millis(50))),
        );

        let result = uc.execute(&question()).await.unwrap();
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].query.text(), "python while loop");
        assert_eq!(result.failures[0].error, "Retrieval timed out after 50ms");
        assert_eq!(result.succeeded_queries(), 3);
    }

    #[tokio::test]
    async fn test_hyde_appended_as_extra_query() {
        let retriever = loop_fixture().with("for i in range(3): print(i)", &["doc H"]);
        let (uc, _, retriever) = use_case(
            MockGateway::with_queries(LOOP_QUERIES).hyde("  for i in range(3): print(i) \n"),
            retriever,
            FusionParams::default().with_hyde(true),
        );

        let result = uc.execute(&question()).await.unwrap();
        assert_eq!(result.queries.len(), 5);
        assert_eq!(result.queries[4].text(), "for i in range(3): print(i)");
        assert!(retriever.queried().contains(&"for i in range(3): print(i)".to_string()));
        assert!(bodies(&result).contains(&"doc H"));
    }

    #[tokio::test]
    async fn test_hyde_failure_is_skipped() {
        let (uc, _, _) = use_case(
            MockGateway::with_queries(LOOP_QUERIES),
            loop_fixture(),
            FusionParams::default().with_hyde(true),
        );

        let result = uc.execute(&question()).await.unwrap();
        assert_eq!(result.queries.len(), 4);
        assert_eq!(result.outcome, FusionOutcome::Success);
    }

    #[tokio::test]
    async fn test_hyde_not_added_to_fallback() {
        let retriever = FixtureRetriever::new()
            .failing("loops in python", "index offline")
            .with("hyde text", &["doc H"]);
        let (uc, sink, retriever) = use_case(
            MockGateway::failing("backend unreachable").hyde("hyde text"),
            retriever,
            FusionParams::default().with_hyde(true),
        );

        let err = uc.execute(&question()).await.unwrap_err();
        assert!(matches!(err, RunFusionError::TotalFailure { .. }));
        assert_eq!(retriever.queried(), vec!["loops in python".to_string()]);

        let records = sink.records.lock().unwrap();
        assert_eq!(records[0].queries, vec![Query::new("loops in python")]);
        assert_eq!(records[0].outcome, FusionOutcome::Failed);
    }

    #[tokio::test]
    async fn test_top_k_bounds_context() {
        let (uc, _, _) = use_case(
            MockGateway::with_queries(LOOP_QUERIES),
            loop_fixture(),
            FusionParams::default().with_top_k(2),
        );

        let result = uc.execute(&question()).await.unwrap();
        assert_eq!(result.context.split(CONTEXT_DELIMITER).count(), 2);
        assert_eq!(result.ranking.len(), 6);
    }

    #[tokio::test]
    async fn test_cancelled_before_retrieval_completes() {
        let token = CancellationToken::new();
        let retriever = loop_fixture().delay("python for loop", Duration::from_secs(10));
        let (uc, sink, _) = use_case(
            MockGateway::with_queries(LOOP_QUERIES),
            retriever,
            FusionParams::default().with_retrieval_timeout(None),
        );
        let uc = uc.with_cancellation(token.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            token.cancel();
        });

        let err = uc.execute(&question()).await.unwrap_err();
        assert!(err.is_cancelled());
        canceller.await.unwrap();
        assert!(sink.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_during_slow_generation() {
        let token = CancellationToken::new();
        let (uc, sink, retriever) = use_case(
            MockGateway::with_queries(LOOP_QUERIES).delayed(Duration::from_secs(10)),
            loop_fixture(),
            FusionParams::default().with_generation_timeout(None),
        );
        let uc = uc.with_cancellation(token.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            token.cancel();
        });

        let err = tokio::time::timeout(Duration::from_secs(2), uc.execute(&question()))
            .await
            .expect("cancellation should not wait for the backend")
            .unwrap_err();
        assert!(err.is_cancelled());
        canceller.await.unwrap();
        assert!(retriever.queried().is_empty());
        assert!(sink.records.lock().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_params_rejected() {
        let result = RunFusionUseCase::new(
            Arc::new(MockGateway::with_queries("")),
            Arc::new(FixtureRetriever::new()),
            FusionParams::default().with_rrf_k(0.0),
        );
        assert!(matches!(result, Err(RunFusionError::InvalidParams(_))));
    }
}
