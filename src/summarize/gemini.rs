//! Gemini summarizer over the generateContent REST endpoint

use super::prompt::{build_user_prompt, SYSTEM_PROMPT};
use super::{SummarizeError, Summarizer};
use crate::config::SummarizerSettings;
use crate::engines::{EngineRequest, EngineResponse};
use crate::network::{is_timeout, HttpClient};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, warn};

/// Summarizer backed by a Gemini model
pub struct GeminiSummarizer {
    client: HttpClient,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
}

impl GeminiSummarizer {
    /// Create a summarizer from settings; the API key must be present
    pub fn new(client: HttpClient, settings: &SummarizerSettings) -> Result<Self, SummarizeError> {
        let api_key = settings
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| SummarizeError::Unavailable("no API key configured".to_string()))?;

        Ok(Self {
            client,
            api_key,
            model: settings.model.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            temperature: settings.temperature,
            timeout: Duration::from_secs_f64(settings.timeout_secs),
        })
    }

    fn endpoint(&self) -> String {
        // Accept both "gemini-x" and "models/gemini-x"
        let model = self.model.trim_start_matches("models/");
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    fn request_body(&self, query: &str, corpus: &str) -> serde_json::Value {
        json!({
            "systemInstruction": { "parts": [{ "text": SYSTEM_PROMPT }] },
            "contents": [{
                "role": "user",
                "parts": [{ "text": build_user_prompt(query, corpus) }]
            }],
            "generationConfig": {
                "temperature": self.temperature,
                "candidateCount": 1
            }
        })
    }

    fn timeout_error(&self) -> SummarizeError {
        SummarizeError::Timeout {
            timeout_ms: self.timeout.as_millis() as u64,
        }
    }

    fn parse(response: EngineResponse) -> Result<String, SummarizeError> {
        if !response.is_success() {
            let message = response
                .json::<ErrorEnvelope>()
                .map(|e| e.error.message)
                .unwrap_or_else(|_| response.text.chars().take(200).collect());
            let reason = match response.status {
                401 | 403 => format!("authentication rejected: {}", message),
                429 => format!("quota exceeded: {}", message),
                status => format!("HTTP {}: {}", status, message),
            };
            return Err(SummarizeError::Unavailable(reason));
        }

        let body: GenerateResponse = response
            .json()
            .map_err(|e| SummarizeError::Unavailable(format!("unparseable response: {}", e)))?;

        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        let text = text.trim();
        if text.is_empty() {
            return Err(SummarizeError::Unavailable(
                "model returned no text".to_string(),
            ));
        }
        Ok(text.to_string())
    }
}

#[async_trait]
impl Summarizer for GeminiSummarizer {
    async fn summarize(&self, query: &str, corpus: &str) -> Result<String, SummarizeError> {
        let start = Instant::now();
        let request = EngineRequest::post(self.endpoint())
            .header("x-goog-api-key", self.api_key.clone())
            .header("Accept", "application/json")
            .json(self.request_body(query, corpus));

        debug!("Requesting summary from {} ({} corpus chars)", self.model, corpus.len());

        let response = match timeout(
            self.timeout,
            self.client.execute_with_timeout(request, self.timeout),
        )
        .await
        {
            Ok(Ok(response)) => response,
            Ok(Err(e)) if is_timeout(&e) => return Err(self.timeout_error()),
            Ok(Err(e)) => {
                warn!("Summary request failed: {}", e);
                return Err(SummarizeError::Unavailable(e.to_string()));
            }
            Err(_) => return Err(self.timeout_error()),
        };

        let summary = Self::parse(response)?;
        debug!("Summary received in {:?}", start.elapsed());
        Ok(summary)
    }
}
