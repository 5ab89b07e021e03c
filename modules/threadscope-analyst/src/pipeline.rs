// One analysis run: locate → fetch → assemble → extract → present.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use threadscope_archive::{ContentFetcher, Corpus, CorpusAssembler, SourceLocator};
use threadscope_common::{
    CandidateDocument, FetchedDocument, InputTarget, Result, ThreadscopeError,
};
use tracing::{info, warn};
use typed_builder::TypedBuilder;
use uuid::Uuid;

use crate::extractor::Extractor;
use crate::parser::ExtractionResult;
use crate::presenter::{present, PresentedTable};
use crate::schema::{AnalysisMode, ExtractionSchema};
use crate::stats::RunStats;

/// Everything a run needs. Built once per invocation; nothing is shared
/// across runs.
#[derive(TypedBuilder)]
pub struct AnalysisPipeline {
    locator: SourceLocator,
    fetcher: ContentFetcher,
    extractor: Extractor,
    #[builder(default)]
    assembler: CorpusAssembler,
    #[builder(default = ExtractionSchema::pricing())]
    schema: ExtractionSchema,
}

/// Immutable result of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub input: String,
    pub mode: AnalysisMode,
    pub model: String,
    pub schema: ExtractionSchema,
    pub candidates: Vec<CandidateDocument>,
    pub documents: Vec<FetchedDocument>,
    pub corpus: Corpus,
    pub result: ExtractionResult,
    pub table: PresentedTable,
    pub stats: RunStats,
}

impl AnalysisReport {
    pub fn group_label(&self) -> Option<&str> {
        self.schema.group_field.as_deref()
    }
}

impl AnalysisPipeline {
    pub fn schema(&self) -> &ExtractionSchema {
        &self.schema
    }

    /// Run the full pipeline for raw user input (a topic or thread URLs).
    pub async fn run(&self, input: &str) -> Result<AnalysisReport> {
        let target = InputTarget::parse(input, self.locator.site());
        self.run_target(&target).await
    }

    pub async fn run_target(&self, target: &InputTarget) -> Result<AnalysisReport> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let clock = Instant::now();
        let label = target.label();
        let mut stats = RunStats::default();

        info!(%run_id, input = label.as_str(), mode = ?self.schema.mode, "Analysis starting");

        let candidates = self.locator.locate(target).await;
        stats.candidates = candidates.len();
        if candidates.is_empty() {
            return Err(ThreadscopeError::NoCandidatesFound(label));
        }

        let documents = self.fetcher.fetch_all(&candidates).await;
        stats.record_fetches(&documents);
        if stats.fetched == 0 {
            return Err(ThreadscopeError::AllFetchesFailed {
                attempted: documents.len(),
            });
        }
        if stats.fetch_failed > 0 {
            warn!(
                failed = stats.fetch_failed,
                fetched = stats.fetched,
                "Some threads could not be fetched, continuing with the rest"
            );
        }

        let corpus = self.assembler.assemble(&documents);
        stats.corpus_sources = corpus.len();
        stats.corpus_bytes = corpus.text.len();
        if corpus.is_empty() {
            return Err(ThreadscopeError::Config(format!(
                "corpus budget of {} bytes leaves no room for any thread",
                self.assembler.max_chars()
            )));
        }

        let result = self.extractor.extract(&corpus, &self.schema).await?;
        stats.entries = result.entries.len();

        let table = present(&result, &self.schema);
        stats.elapsed_ms = clock.elapsed().as_millis();
        info!(%run_id, entries = stats.entries, elapsed_ms = stats.elapsed_ms as u64, "Analysis complete");

        Ok(AnalysisReport {
            run_id,
            started_at,
            input: label,
            mode: self.schema.mode,
            model: self.extractor.model_name().to_string(),
            schema: self.schema.clone(),
            candidates,
            documents,
            corpus,
            result,
            table,
            stats,
        })
    }
}
