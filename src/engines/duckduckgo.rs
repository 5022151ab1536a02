//! DuckDuckGo search engine implementation (HTML endpoint)

use super::traits::*;
use crate::content::clean_text;
use crate::results::SearchResult;
use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use url::Url;

static RESULT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".result").expect("valid selector"));
static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".result__title a").expect("valid selector"));
static SNIPPET_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".result__snippet").expect("valid selector"));
// Served instead of results when DuckDuckGo suspects a bot
static CHALLENGE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".anomaly-modal__modal, #challenge-form").expect("valid selector")
});

/// DuckDuckGo web search engine
pub struct DuckDuckGo {
    html_url: String,
}

impl DuckDuckGo {
    pub fn new() -> Self {
        Self::with_base_url("https://html.duckduckgo.com/html/")
    }

    /// Point the engine at a different endpoint
    pub fn with_base_url(url: impl Into<String>) -> Self {
        Self {
            html_url: url.into(),
        }
    }

    fn parse_html_results(&self, document: &Html) -> Vec<SearchResult> {
        let base = Url::parse(&self.html_url).ok();
        let mut results = Vec::new();

        for element in document.select(&RESULT_SELECTOR) {
            if is_ad(&element) {
                continue;
            }

            let link = match element.select(&TITLE_SELECTOR).next() {
                Some(l) => l,
                None => continue,
            };

            let title = clean_text(&link.text().collect::<String>());
            if title.is_empty() {
                continue;
            }

            let href = link.value().attr("href").unwrap_or_default();
            let url = match resolve_link(base.as_ref(), href) {
                Some(u) => u,
                None => continue,
            };

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

impl Default for DuckDuckGo {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for DuckDuckGo {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    fn request(&self, params: &RequestParams) -> Result<EngineRequest> {
        Ok(EngineRequest::get(&self.html_url).param("q", params.query.clone()))
    }

    fn response(&self, response: EngineResponse) -> Result<Vec<SearchResult>> {
        if !response.is_success() {
            return Err(anyhow!("HTTP error: {}", response.status));
        }

        let document = Html::parse_document(&response.text);
        if document.select(&CHALLENGE_SELECTOR).next().is_some() {
            return Err(anyhow!("bot challenge page returned"));
        }

        // The count is applied by the caller; parse everything on the page
        Ok(self.parse_html_results(&document))
    }
}

fn is_ad(element: &ElementRef) -> bool {
    element
        .value()
        .classes()
        .any(|c| c == "result--ad" || c == "result--ad--small")
}

/// Turn a result href into an absolute target URL.
///
/// Result links usually go through `/l/?uddg=<target>`; the redirect is
/// unwrapped so stored results point at the page itself.
fn resolve_link(base: Option<&Url>, href: &str) -> Option<String> {
    if href.is_empty() {
        return None;
    }

    let url = match base {
        Some(base) => base.join(href).ok()?,
        None => Url::parse(href).ok()?,
    };

    let url = if url.path() == "/l/" {
        let target = url
            .query_pairs()
            .find(|(k, _)| k == "uddg")
            .map(|(_, v)| v.into_owned())?;
        Url::parse(&target).ok()?
    } else {
        url
    };

    match url.scheme() {
        "http" | "https" => Some(url.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SAMPLE_PAGE: &str = r#"
        <html><body>
          <div class="result results_links result--ad">
            <h2 class="result__title"><a href="https://ads.example.com/">Sponsored</a></h2>
          </div>
          <div class="result results_links">
            <h2 class="result__title">
              <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fen.wikipedia.org%2Fwiki%2FParis&amp;rut=abc">Paris - Wikipedia</a>
            </h2>
            <a class="result__snippet">Paris is the   capital of France.</a>
          </div>
          <div class="result results_links">
            <h2 class="result__title"><a href="https://www.britannica.com/place/Paris">Paris | Britannica</a></h2>
          </div>
          <div class="result results_links">
            <h2 class="result__title"><a href="javascript:void(0)">Broken</a></h2>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_duckduckgo_request() {
        let ddg = DuckDuckGo::new();
        let params = RequestParams::new("rust programming");
        let request = ddg.request(&params).unwrap();

        assert!(request.url.contains("duckduckgo.com"));
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(
            request.params.get("q").map(String::as_str),
            Some("rust programming")
        );
    }

    fn ok_response(text: &str) -> EngineResponse {
        EngineResponse {
            status: 200,
            headers: HashMap::new(),
            text: text.to_string(),
            url: "https://html.duckduckgo.com/html/".to_string(),
        }
    }

    #[test]
    fn test_parse_results_unwraps_redirects() {
        let ddg = DuckDuckGo::new();
        let results = ddg.response(ok_response(SAMPLE_PAGE)).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Paris - Wikipedia");
        assert_eq!(results[0].url, "https://en.wikipedia.org/wiki/Paris");
        assert_eq!(results[0].snippet, "Paris is the capital of France.");
        assert_eq!(results[1].url, "https://www.britannica.com/place/Paris");
        assert_eq!(results[1].snippet, "");
    }

    #[test]
    fn test_captcha_in_result_text_is_not_a_challenge() {
        let page = r#"
            <html><body>
              <input name="q" value="how does recaptcha work">
              <div class="result results_links">
                <h2 class="result__title"><a href="https://en.wikipedia.org/wiki/ReCAPTCHA">reCAPTCHA - Wikipedia</a></h2>
                <a class="result__snippet">reCAPTCHA is a CAPTCHA system owned by Google.</a>
              </div>
            </body></html>
        "#;

        let results = DuckDuckGo::new().response(ok_response(page)).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].snippet, "reCAPTCHA is a CAPTCHA system owned by Google.");
    }

    #[test]
    fn test_challenge_page_is_rejected() {
        let page = r#"
            <html><body>
              <div class="anomaly-modal__modal">
                <form id="challenge-form" action="/anomaly.js"></form>
              </div>
            </body></html>
        "#;

        assert!(DuckDuckGo::new().response(ok_response(page)).is_err());
    }

    #[test]
    fn test_error_status_is_rejected() {
        let ddg = DuckDuckGo::new();
        let mut response = ok_response("");
        response.status = 503;
        assert!(ddg.response(response).is_err());
    }
}
