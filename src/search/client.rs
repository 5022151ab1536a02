//! Web search client: one engine, one attempt per call

use crate::engines::{Engine, EngineResponse, RequestParams};
use crate::network::{is_timeout, HttpClient};
use crate::results::SearchResult;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Errors that can occur during search operations
#[derive(Debug, Error)]
pub enum SearchError {
    /// Provider could not be reached or answered with an error status
    #[error("Search provider {engine} unavailable: {reason}")]
    Unavailable { engine: String, reason: String },

    /// Provider answered but the page could not be parsed
    #[error("Search provider {engine} returned an unparseable response: {reason}")]
    InvalidResponse { engine: String, reason: String },

    /// Provider did not answer in time
    #[error("Search provider {engine} timed out after {timeout_ms}ms")]
    Timeout { engine: String, timeout_ms: u64 },
}

/// Source of ranked search candidates
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Return at most `count` results in provider ranking order
    async fn search(&self, query: &str, count: usize) -> Result<Vec<SearchResult>, SearchError>;
}

/// Search client backed by an HTML engine and the shared HTTP client
pub struct EngineSearchClient {
    client: HttpClient,
    engine: Arc<dyn Engine>,
    timeout: Duration,
}

impl EngineSearchClient {
    /// Create a new search client
    pub fn new(client: HttpClient, engine: Arc<dyn Engine>) -> Self {
        Self {
            client,
            engine,
            timeout: Duration::from_secs(10),
        }
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn parse(&self, response: EngineResponse) -> Result<Vec<SearchResult>, SearchError> {
        let engine = self.engine.name().to_string();

        if !response.is_success() {
            return Err(SearchError::Unavailable {
                engine,
                reason: format!("HTTP {}", response.status),
            });
        }

        self.engine
            .response(response)
            .map_err(|e| SearchError::InvalidResponse {
                engine,
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl SearchClient for EngineSearchClient {
    async fn search(&self, query: &str, count: usize) -> Result<Vec<SearchResult>, SearchError> {
        let engine_name = self.engine.name().to_string();
        let start = Instant::now();

        let params = RequestParams::new(query);
        let request = self
            .engine
            .request(&params)
            .map_err(|e| SearchError::Unavailable {
                engine: engine_name.clone(),
                reason: format!("failed to build request: {}", e),
            })?;

        debug!("Searching {} with timeout {:?}", engine_name, self.timeout);

        let response = match timeout(
            self.timeout,
            self.client.execute_with_timeout(request, self.timeout),
        )
        .await
        {
            Ok(Ok(response)) => response,
            Ok(Err(e)) if is_timeout(&e) => {
                warn!("Timeout for engine {}", engine_name);
                return Err(SearchError::Timeout {
                    engine: engine_name,
                    timeout_ms: self.timeout.as_millis() as u64,
                });
            }
            Ok(Err(e)) => {
                warn!("Request failed for {}: {}", engine_name, e);
                return Err(SearchError::Unavailable {
                    engine: engine_name,
                    reason: e.to_string(),
                });
            }
            Err(_) => {
                warn!("Timeout for engine {}", engine_name);
                return Err(SearchError::Timeout {
                    engine: engine_name,
                    timeout_ms: self.timeout.as_millis() as u64,
                });
            }
        };

        let mut results = self.parse(response)?;
        results.truncate(count);

        info!(
            "Engine {} returned {} results for '{}' in {:?}",
            engine_name,
            results.len(),
            query,
            start.elapsed()
        );

        Ok(results)
    }
}
