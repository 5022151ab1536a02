//! Result type definitions

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// A single search hit as ranked by the search provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The title of the result
    pub title: String,
    /// Absolute URL of the result
    pub url: String,
    /// Snippet/description, possibly empty
    #[serde(default)]
    pub snippet: String,
}

impl SearchResult {
    /// Create a new result
    pub fn new(title: impl Into<String>, url: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
        }
    }
}

/// One complete query, results and summary cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchRun {
    /// Identifier assigned by the history store; absent if the run was not stored
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// The query as submitted
    pub query: String,
    /// Results in search ranking order
    pub results: Vec<SearchResult>,
    /// Generated summary
    pub summary: String,
    /// When the run completed
    pub created_at: DateTime<Utc>,
}

impl ResearchRun {
    /// Create an unsaved run stamped with the current time.
    ///
    /// The timestamp is kept to microseconds, the precision the store keeps.
    pub fn new(query: impl Into<String>, results: Vec<SearchResult>, summary: impl Into<String>) -> Self {
        Self {
            id: None,
            query: query.into(),
            results,
            summary: summary.into(),
            created_at: Utc::now().trunc_subsecs(6),
        }
    }

    /// Set the store-assigned identifier
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}

/// A search hit paired with the text fed to the summarizer
#[derive(Debug, Clone)]
pub struct Document {
    pub result: SearchResult,
    /// Extracted page text, or the snippet when extraction came back empty
    pub content: String,
}

impl Document {
    pub fn new(result: SearchResult, extracted: String) -> Self {
        let content = if extracted.trim().is_empty() {
            result.snippet.clone()
        } else {
            extracted
        };
        Self { result, content }
    }
}
