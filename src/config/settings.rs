//! Settings structures for the research service configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main settings structure matching settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub outgoing: OutgoingSettings,
    pub search: SearchSettings,
    pub extractor: ExtractorSettings,
    pub summarizer: SummarizerSettings,
    pub research: ResearchSettings,
    pub history: HistorySettings,
    pub database: DatabaseSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("RESEARCH_DEBUG") {
            self.server.debug = val.parse().unwrap_or(false);
        }
        if let Ok(val) = std::env::var("RESEARCH_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("RESEARCH_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Ok(val) = std::env::var("ALLOWED_ORIGIN") {
            self.server.allowed_origin = val;
        }
        if let Ok(val) = std::env::var("GEMINI_API_KEY") {
            self.summarizer.api_key = Some(val);
        }
        if let Ok(val) = std::env::var("GEMINI_MODEL") {
            self.summarizer.model = val;
        }
        if let Ok(val) = std::env::var("RESEARCH_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                self.research.timeout_secs = secs;
            }
        }
        if let Ok(val) = std::env::var("DATABASE_URL") {
            self.database.url = val;
        }
    }

    /// Check the settings a running server cannot do without
    pub fn validate(&self) -> Result<()> {
        match self.summarizer.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => {}
            _ => bail!("GEMINI_API_KEY is not set"),
        }

        for (name, secs) in [
            ("outgoing.request_timeout", self.outgoing.request_timeout),
            ("search.timeout_secs", self.search.timeout_secs),
            ("extractor.timeout_secs", self.extractor.timeout_secs),
            ("summarizer.timeout_secs", self.summarizer.timeout_secs),
            ("research.timeout_secs", self.research.timeout_secs),
        ] {
            if !(secs.is_finite() && secs > 0.0) {
                bail!("{} must be a positive number of seconds, got {}", name, secs);
            }
        }
        // A single slow page must not use up the whole run
        if self.extractor.timeout_secs >= self.research.timeout_secs {
            bail!(
                "extractor.timeout_secs ({}) must be below research.timeout_secs ({})",
                self.extractor.timeout_secs,
                self.research.timeout_secs
            );
        }

        if self.extractor.concurrency == 0 {
            bail!("extractor.concurrency must be at least 1");
        }
        if self.extractor.max_page_bytes == 0 {
            bail!("extractor.max_page_bytes must be at least 1");
        }
        Ok(())
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Enable debug logging
    pub debug: bool,
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
    /// Browser origin allowed to call the API
    pub allowed_origin: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            debug: false,
            port: 8000,
            bind_address: "0.0.0.0".to_string(),
            allowed_origin: "http://localhost:3000".to_string(),
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Default request timeout in seconds
    pub request_timeout: f64,
    /// Fixed user agent (none = random desktop browser)
    pub user_agent: Option<String>,
    /// Pool max idle connections per host
    pub pool_maxsize: usize,
    /// Proxy for all outgoing requests
    pub proxy: Option<String>,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 10.0,
            user_agent: None,
            pool_maxsize: 20,
            proxy: None,
        }
    }
}

/// Web search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Engine used for searches (duckduckgo, brave)
    pub engine: String,
    /// Override the engine endpoint
    pub base_url: Option<String>,
    /// Search request timeout in seconds
    pub timeout_secs: f64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            engine: "duckduckgo".to_string(),
            base_url: None,
            timeout_secs: 10.0,
        }
    }
}

/// Page content extraction settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorSettings {
    /// Per-page fetch timeout in seconds
    pub timeout_secs: f64,
    /// Maximum characters kept from one page
    pub max_chars: usize,
    /// Pages fetched at the same time within one run
    pub concurrency: usize,
    /// Bytes of HTML read from one page, the rest is dropped
    pub max_page_bytes: usize,
}

impl Default for ExtractorSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 5.0,
            max_chars: 8000,
            concurrency: 4,
            max_page_bytes: 2 * 1024 * 1024,
        }
    }
}

/// Summarization model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerSettings {
    /// Gemini API key
    pub api_key: Option<String>,
    /// Model identifier
    pub model: String,
    /// API root
    pub base_url: String,
    /// Model call timeout in seconds
    pub timeout_secs: f64,
    /// Sampling temperature
    pub temperature: f32,
    /// Documents included in the prompt
    pub max_documents: usize,
    /// Characters kept from each document
    pub excerpt_chars: usize,
}

impl Default for SummarizerSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.0-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_secs: 10.0,
            temperature: 0.3,
            max_documents: 5,
            excerpt_chars: 800,
        }
    }
}

/// Research pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchSettings {
    /// Bound on search, extraction and summarization together, in seconds
    pub timeout_secs: f64,
    /// Result count used when a request names none
    pub default_results: u32,
    /// Largest accepted result count
    pub max_results: u32,
}

impl Default for ResearchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 10.0,
            default_results: 5,
            max_results: 10,
        }
    }
}

/// History listing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// Runs listed when no limit is given
    pub default_limit: u32,
    /// Upper bound on a requested limit
    pub max_limit: u32,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            default_limit: 100,
            max_limit: 1000,
        }
    }
}

/// Database settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// SQLite connection URL
    pub url: String,
    /// Pool size
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "sqlite://research_history.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}
