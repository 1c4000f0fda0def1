use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::Instrument;
use uuid::Uuid;

use crate::catalog::{Dataset, DEFAULT_COLLECTION_NAME};
use crate::embedding::Embedder;
use crate::error::{PartMatchError, Result};
use crate::models::{CatalogItem, ExplainedMatch};
use crate::vector_store::{SearchResult, VectorStore};

use super::explainer::Explainer;
use super::indexer::Indexer;
use super::matcher::Matcher;

/// Everything a run produced.
///
/// `failure` holds the error that stopped matching early. The records matched
/// before it are still in `results`.
#[derive(Debug)]
pub struct PipelineReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub indexed: usize,
    pub results: Vec<ExplainedMatch>,
    pub failure: Option<PartMatchError>,
}

impl PipelineReport {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }

    pub fn explained_count(&self) -> usize {
        self.results
            .iter()
            .filter(|m| m.explanation.is_generated())
            .count()
    }
}

/// Loader → Indexer → Matcher → Explainer, strictly in sequence.
pub struct MatchPipeline {
    indexer: Indexer,
    explainer: Explainer,
    collection_name: String,
    show_progress: bool,
}

impl MatchPipeline {
    pub fn new(embedder: Arc<dyn Embedder>, explainer: Explainer) -> Self {
        Self {
            indexer: Indexer::new(embedder),
            explainer,
            collection_name: DEFAULT_COLLECTION_NAME.to_string(),
            show_progress: false,
        }
    }

    pub fn with_collection_name(mut self, name: impl Into<String>) -> Self {
        self.collection_name = name.into();
        self
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    /// Index the catalog, match every competitor and explain the matches.
    ///
    /// Rejected LLM credentials and indexing errors are returned as `Err`.
    /// A matching error ends the
    /// matching stage and is reported in [`PipelineReport::failure`].
    pub async fn run(&self, dataset: &Dataset) -> Result<PipelineReport> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("run", %run_id);
        self.run_stages(run_id, dataset).instrument(span).await
    }

    async fn run_stages(&self, run_id: Uuid, dataset: &Dataset) -> Result<PipelineReport> {
        let started_at = Utc::now();
        let started = Instant::now();

        tracing::info!(
            catalog = dataset.catalog.len(),
            competitors = dataset.competitors.len(),
            collection = %self.collection_name,
            "Starting match run"
        );

        self.explainer.check_ready().await?;

        let mut store = VectorStore::new();
        let indexed = self
            .indexer
            .index(&mut store, &self.collection_name, &dataset.catalog)
            .await?;

        let outcome = Matcher::new(&store, self.collection_name.as_str())
            .match_all(&dataset.competitors)
            .await;

        let progress = self.progress_bar(outcome.results.len());
        let results = self
            .explainer
            .explain_all(outcome.results, progress.as_ref())
            .await;
        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        let report = PipelineReport {
            run_id,
            started_at,
            indexed,
            results,
            failure: outcome.failure,
        };

        tracing::info!(
            matched = report.results.len(),
            explained = report.explained_count(),
            complete = report.is_complete(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Run finished"
        );

        Ok(report)
    }

    /// Index `catalog` and return the best `k` items for one description.
    pub async fn search(
        &self,
        catalog: &[CatalogItem],
        query: &str,
        k: usize,
    ) -> Result<Vec<SearchResult>> {
        if query.trim().is_empty() {
            return Err(PartMatchError::validation(
                "query",
                "query description must not be empty",
            ));
        }

        let mut store = VectorStore::new();
        self.indexer
            .index(&mut store, &self.collection_name, catalog)
            .await?;
        store
            .similarity_search_with_score(&self.collection_name, query, k)
            .await
    }

    fn progress_bar(&self, len: usize) -> Option<ProgressBar> {
        if !self.show_progress || !self.explainer.is_enabled() || len == 0 {
            return None;
        }

        let pb = ProgressBar::new(len as u64);
        match ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} explained {msg}")
        {
            Ok(style) => pb.set_style(style.progress_chars("━━╸")),
            Err(e) => tracing::debug!(error = %e, "Falling back to default progress style"),
        }
        Some(pb)
    }
}
