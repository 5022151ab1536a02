//! Shared fixtures for integration tests

#![allow(dead_code)]

use research_agent::config::Settings;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_KEY: &str = "test-key";
pub const GEMINI_PATH: &str = "/models/gemini-2.0-flash:generateContent";

/// Settings pointing every outbound call at `server`
pub fn settings_for(server: &MockServer) -> Settings {
    let mut settings = Settings::default();
    settings.search.base_url = Some(format!("{}/html/", server.uri()));
    settings.summarizer.base_url = server.uri();
    settings.summarizer.api_key = Some(API_KEY.to_string());
    settings.database.url = "sqlite::memory:".to_string();
    settings
}

/// A DuckDuckGo-style results page linking to `/page{i}` on the mock server
pub fn results_page(server: &MockServer, count: usize) -> String {
    let mut html = String::from("<html><body><div id=\"links\">");
    for i in 1..=count {
        html.push_str(&format!(
            r#"<div class="result results_links">
                 <h2 class="result__title"><a class="result__a" href="{uri}/page{i}">Result {i}</a></h2>
                 <a class="result__snippet">Snippet for result {i}</a>
               </div>"#,
            uri = server.uri(),
            i = i
        ));
    }
    html.push_str("</div></body></html>");
    html
}

/// An article page whose main text names its number
pub fn article(i: usize) -> String {
    format!(
        r#"<html><head><script>var tracking = true;</script></head><body>
             <nav>Home | About</nav>
             <article><p>Article body number {i}.</p><p>Paris is the capital of France.</p></article>
             <footer>Copyright</footer>
           </body></html>"#,
        i = i
    )
}

pub fn html_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

pub fn gemini_reply(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    }))
}

/// Mount a results page with `count` hits and their article pages
pub async fn mount_search(server: &MockServer, count: usize) {
    Mock::given(method("GET"))
        .and(path("/html/"))
        .respond_with(html_response(results_page(server, count)))
        .mount(server)
        .await;

    for i in 1..=count {
        Mock::given(method("GET"))
            .and(path(format!("/page{}", i)))
            .respond_with(html_response(article(i)))
            .mount(server)
            .await;
    }
}
