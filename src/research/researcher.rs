//! Research pipeline: search, extract, summarize, persist

use super::ResearchError;
use crate::config::Settings;
use crate::content::Extractor;
use crate::history::HistoryStore;
use crate::results::{Document, ResearchRun, SearchResult};
use crate::search::SearchClient;
use crate::summarize::{build_corpus, Summarizer};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout, timeout_at, Instant};
use tracing::{debug, error, info, info_span, Instrument};

/// Summary stored when the search finds nothing
pub const NO_RESULTS_SUMMARY: &str = "No search results were found for this query.";

/// Share of the time left after searching that page extraction may use;
/// the rest is kept for the summarizer
const EXTRACTION_SHARE: f64 = 0.5;

/// Tunables for one research run
#[derive(Debug, Clone)]
pub struct ResearchOptions {
    /// Bound on search, extraction and summarization together
    pub timeout: Duration,
    /// Result count when the caller names none
    pub default_results: u32,
    /// Largest accepted result count
    pub max_results: u32,
    /// Pages extracted at the same time
    pub extract_concurrency: usize,
    /// Documents included in the corpus
    pub max_documents: usize,
    /// Characters kept from each document
    pub excerpt_chars: usize,
}

impl ResearchOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            timeout: Duration::from_secs_f64(settings.research.timeout_secs),
            default_results: settings.research.default_results,
            max_results: settings.research.max_results,
            extract_concurrency: settings.extractor.concurrency.max(1),
            max_documents: settings.summarizer.max_documents,
            excerpt_chars: settings.summarizer.excerpt_chars,
        }
    }
}

impl Default for ResearchOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Runs the research pipeline over injected collaborators
pub struct Researcher {
    search: Arc<dyn SearchClient>,
    extractor: Arc<dyn Extractor>,
    summarizer: Arc<dyn Summarizer>,
    store: Arc<dyn HistoryStore>,
    options: ResearchOptions,
}

impl Researcher {
    pub fn new(
        search: Arc<dyn SearchClient>,
        extractor: Arc<dyn Extractor>,
        summarizer: Arc<dyn Summarizer>,
        store: Arc<dyn HistoryStore>,
        options: ResearchOptions,
    ) -> Self {
        Self {
            search,
            extractor,
            summarizer,
            store,
            options,
        }
    }

    /// Research a query end to end and record the run.
    ///
    /// Nothing is stored when validation, search, summarization or the
    /// overall timeout fails. A failed store write is logged and the run is
    /// returned without an id.
    pub async fn run(&self, query: &str, result_count: Option<i64>) -> Result<ResearchRun, ResearchError> {
        let query = query.trim();
        let count = self.validate(query, result_count)?;

        let span = info_span!("research", query = %query, count);
        self.run_validated(query, count).instrument(span).await
    }

    fn validate(&self, query: &str, result_count: Option<i64>) -> Result<usize, ResearchError> {
        if query.is_empty() {
            return Err(ResearchError::Validation(
                "Query text must not be empty".to_string(),
            ));
        }

        let max = i64::from(self.options.max_results);
        let count = result_count.unwrap_or_else(|| i64::from(self.options.default_results));
        if !(1..=max).contains(&count) {
            return Err(ResearchError::Validation(format!(
                "num_results must be between 1 and {}, got {}",
                max, count
            )));
        }

        Ok(count as usize)
    }

    async fn run_validated(&self, query: &str, count: usize) -> Result<ResearchRun, ResearchError> {
        let start = Instant::now();
        let deadline = start + self.options.timeout;

        let (results, summary) = timeout(self.options.timeout, self.gather(query, count, deadline))
            .await
            .map_err(|_| {
                error!("Research timed out after {:?}", self.options.timeout);
                ResearchError::Timeout(format!(
                    "research did not finish within {:?}",
                    self.options.timeout
                ))
            })??;

        let run = ResearchRun::new(query, results, summary);

        match self.store.append(&run).await {
            Ok(id) => {
                info!(
                    "Research run {} finished with {} results in {:?}",
                    id,
                    run.results.len(),
                    start.elapsed()
                );
                Ok(run.with_id(id))
            }
            Err(e) => {
                error!("Failed to store research run: {}", e);
                Ok(run)
            }
        }
    }

    async fn gather(
        &self,
        query: &str,
        count: usize,
        deadline: Instant,
    ) -> Result<(Vec<SearchResult>, String), ResearchError> {
        let mut results = self
            .search
            .search(query, count)
            .await
            .map_err(|e| {
                error!("Search failed: {}", e);
                ResearchError::SearchUnavailable(e)
            })?;
        results.truncate(count);

        if results.is_empty() {
            info!("Search returned no results");
            return Ok((results, NO_RESULTS_SUMMARY.to_string()));
        }

        let now = Instant::now();
        let extract_deadline =
            now + deadline.saturating_duration_since(now).mul_f64(EXTRACTION_SHARE);
        let documents = self.extract_all(&results, extract_deadline).await;
        let corpus = build_corpus(
            &documents,
            self.options.max_documents,
            self.options.excerpt_chars,
        );

        let summary = self.summarizer.summarize(query, &corpus).await.map_err(|e| {
            error!("Summarization failed: {}", e);
            ResearchError::from(e)
        })?;

        Ok((results, summary))
    }

    /// Extract every result's page, keeping search ranking order.
    ///
    /// Pages still loading at `deadline` are given up on and fall back to
    /// their snippets.
    async fn extract_all(&self, results: &[SearchResult], deadline: Instant) -> Vec<Document> {
        let extractor = &self.extractor;

        // `buffered` yields in input order regardless of completion order
        let documents: Vec<Document> = stream::iter(results.iter().cloned())
            .map(|result| async move {
                let text = timeout_at(deadline, extractor.extract(&result.url))
                    .await
                    .unwrap_or_else(|_| {
                        debug!("Gave up extracting {} at the extraction deadline", result.url);
                        String::new()
                    });
                Document::new(result, text)
            })
            .buffered(self.options.extract_concurrency)
            .collect()
            .await;

        let extracted = documents
            .iter()
            .filter(|d| d.content != d.result.snippet)
            .count();
        debug!(
            "Extracted {}/{} pages, the rest fell back to snippets",
            extracted,
            documents.len()
        );

        documents
    }
}
