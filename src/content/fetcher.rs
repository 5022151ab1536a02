//! Page fetching for content extraction
//!
//! Fetches candidate pages and hands the HTML to the extractor. Every
//! failure degrades to empty text; nothing here reaches the caller as an error.

use super::extractor::extract_main_content;
use crate::config::ExtractorSettings;
use crate::engines::EngineRequest;
use crate::network::{is_timeout, HttpClient};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Turns a URL into plain text
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Best-effort page text; empty when anything goes wrong
    async fn extract(&self, url: &str) -> String;
}

/// Content fetch error types
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Unsupported URL: {0}")]
    UnsupportedUrl(String),
    #[error("Timeout fetching: {0}")]
    Timeout(String),
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("HTTP {0} for: {1}")]
    HttpStatus(u16, String),
    #[error("Not an HTML page ({0}): {1}")]
    NotHtml(String, String),
    #[error("Extraction failed: {0}")]
    Extraction(String),
}

/// Extractor that downloads pages over HTTP
pub struct ContentFetcher {
    client: HttpClient,
    timeout: Duration,
    max_chars: usize,
    max_page_bytes: usize,
}

impl ContentFetcher {
    /// Create a new content fetcher
    pub fn new(client: HttpClient, settings: &ExtractorSettings) -> Self {
        Self {
            client,
            timeout: Duration::from_secs_f64(settings.timeout_secs),
            max_chars: settings.max_chars,
            max_page_bytes: settings.max_page_bytes,
        }
    }

    /// Fetch one page and extract its text
    pub async fn fetch_content(&self, url: &str) -> Result<String, FetchError> {
        if !is_fetchable_url(url) {
            return Err(FetchError::UnsupportedUrl(url.to_string()));
        }

        let request = EngineRequest::get(url).header("Accept", "text/html");
        let response = self.client.send(request, self.timeout).await.map_err(|e| {
            if is_timeout(&e) {
                FetchError::Timeout(url.to_string())
            } else {
                FetchError::Http(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16(), url.to_string()));
        }

        // Checked before the body is read so large binaries are never downloaded
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();
        if !is_html(&content_type) {
            return Err(FetchError::NotHtml(content_type, url.to_string()));
        }

        let html = read_capped(response, self.max_page_bytes)
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout(url.to_string())
                } else {
                    FetchError::Http(e.to_string())
                }
            })?;

        let max_chars = self.max_chars;
        tokio::task::spawn_blocking(move || extract_main_content(&html, max_chars))
            .await
            .map_err(|e| FetchError::Extraction(e.to_string()))
    }
}

#[async_trait]
impl Extractor for ContentFetcher {
    async fn extract(&self, url: &str) -> String {
        match self.fetch_content(url).await {
            Ok(text) => {
                debug!("Extracted {} chars from {}", text.len(), url);
                text
            }
            Err(e) => {
                debug!("Extraction failed, using empty text: {}", e);
                String::new()
            }
        }
    }
}

/// Read at most `max_bytes` of the body; anything past that is dropped unread
async fn read_capped(mut response: reqwest::Response, max_bytes: usize) -> reqwest::Result<String> {
    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        let room = max_bytes - body.len();
        if chunk.len() >= room {
            body.extend_from_slice(&chunk[..room]);
            debug!("Page body cut at {} bytes", max_bytes);
            break;
        }
        body.extend_from_slice(&chunk);
    }
    Ok(String::from_utf8_lossy(&body).into_owned())
}

fn is_fetchable_url(url: &str) -> bool {
    Url::parse(url)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
        .unwrap_or(false)
}

fn is_html(content_type: &str) -> bool {
    content_type.contains("text/html") || content_type.contains("application/xhtml+xml")
}
