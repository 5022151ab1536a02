//! Summarization module
//!
//! Condenses a query and its corpus into a short bullet-point summary
//! through an external language model.

mod gemini;
mod prompt;

pub use gemini::GeminiSummarizer;
pub use prompt::{build_corpus, build_user_prompt, SYSTEM_PROMPT};

use async_trait::async_trait;
use thiserror::Error;

/// Errors from the summarization provider
#[derive(Debug, Error)]
pub enum SummarizeError {
    /// Authentication, quota, transport or response problems
    #[error("Summarizer unavailable: {0}")]
    Unavailable(String),

    /// The model did not answer within the configured bound
    #[error("Summarizer timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

/// Produces a natural-language summary of a corpus
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, query: &str, corpus: &str) -> Result<String, SummarizeError>;
}
