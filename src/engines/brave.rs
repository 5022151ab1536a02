//! Brave search engine implementation (HTML results page)

use super::traits::*;
use crate::content::clean_text;
use crate::results::SearchResult;
use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

static RESULT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.snippet").expect("valid selector"));
static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("valid selector"));
static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".title, .snippet-title").expect("valid selector"));
static SNIPPET_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".snippet-description, .generic-snippet .content").expect("valid selector")
});

/// Brave web search engine
pub struct Brave {
    base_url: String,
}

impl Brave {
    pub fn new() -> Self {
        Self::with_base_url("https://search.brave.com/search")
    }

    /// Point the engine at a different endpoint
    pub fn with_base_url(url: impl Into<String>) -> Self {
        Self {
            base_url: url.into(),
        }
    }

    fn parse_results(&self, html: &str) -> Vec<SearchResult> {
        let document = Html::parse_document(html);
        let mut results = Vec::new();

        for element in document.select(&RESULT_SELECTOR) {
            // Brave marks organic web hits with data-type="web"
            if element
                .value()
                .attr("data-type")
                .is_some_and(|t| t != "web")
            {
                continue;
            }

            let url = match element
                .select(&LINK_SELECTOR)
                .find_map(|a| a.value().attr("href"))
                .and_then(|h| Url::parse(h).ok())
            {
                Some(u) if matches!(u.scheme(), "http" | "https") => u.to_string(),
                _ => continue,
            };

            let title = element
                .select(&TITLE_SELECTOR)
                .next()
                .map(|t| clean_text(&t.text().collect::<String>()))
                .unwrap_or_default();
            if title.is_empty() {
                continue;
            }

            let snippet = element
                .select(&SNIPPET_SELECTOR)
                .next()
                .map(|s| clean_text(&s.text().collect::<String>()))
                .unwrap_or_default();

            results.push(SearchResult::new(title, url, snippet));
        }

        results
    }
}

impl Default for Brave {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for Brave {
    fn name(&self) -> &str {
        "brave"
    }

    fn request(&self, params: &RequestParams) -> Result<EngineRequest> {
        Ok(EngineRequest::get(&self.base_url)
            .param("q", params.query.clone())
            .param("source", "web"))
    }

    fn response(&self, response: EngineResponse) -> Result<Vec<SearchResult>> {
        if !response.is_success() {
            return Err(anyhow!("HTTP error: {}", response.status));
        }
        Ok(self.parse_results(&response.text))
    }
}
