//! Engine loader for building the configured search engine

use super::traits::Engine;
use super::{brave, duckduckgo};
use crate::config::SearchSettings;
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

/// Loader for initializing the search engine from configuration
pub struct EngineLoader;

impl EngineLoader {
    /// Build the engine named in settings
    pub fn load(settings: &SearchSettings) -> Result<Arc<dyn Engine>> {
        let base_url = settings.base_url.as_deref();

        let engine: Arc<dyn Engine> = match settings.engine.as_str() {
            "duckduckgo" => Arc::new(match base_url {
                Some(url) => duckduckgo::DuckDuckGo::with_base_url(url),
                None => duckduckgo::DuckDuckGo::new(),
            }),
            "brave" => Arc::new(match base_url {
                Some(url) => brave::Brave::with_base_url(url),
                None => brave::Brave::new(),
            }),
            other => {
                return Err(anyhow::anyhow!(
                    "Unknown engine type: {} (available: {})",
                    other,
                    Self::available_engines().join(", ")
                ));
            }
        };

        info!("Loaded search engine: {}", engine.name());
        Ok(engine)
    }

    /// Get list of available engine types
    pub fn available_engines() -> Vec<&'static str> {
        vec!["duckduckgo", "brave"]
    }
}
