//! Research orchestration
//!
//! Composes search, extraction, summarization and history into one run.

mod researcher;

pub use researcher::{ResearchOptions, Researcher, NO_RESULTS_SUMMARY};

use crate::search::SearchError;
use crate::summarize::SummarizeError;
use thiserror::Error;

/// Failures a research run can end with
#[derive(Debug, Error)]
pub enum ResearchError {
    /// Bad input shape or range
    #[error("{0}")]
    Validation(String),

    /// The search provider failed; there is nothing to summarize
    #[error("Search failed: {0}")]
    SearchUnavailable(#[source] SearchError),

    /// The summarization provider failed
    #[error("Summarization failed: {0}")]
    SummarizerUnavailable(String),

    /// The run exceeded its time bound
    #[error("Research timed out: {0}")]
    Timeout(String),
}

impl From<SummarizeError> for ResearchError {
    fn from(err: SummarizeError) -> Self {
        match err {
            SummarizeError::Unavailable(reason) => ResearchError::SummarizerUnavailable(reason),
            SummarizeError::Timeout { .. } => ResearchError::Timeout(err.to_string()),
        }
    }
}
