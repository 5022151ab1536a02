//! Application state shared across handlers

use crate::config::Settings;
use crate::history::HistoryStore;
use crate::research::Researcher;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Research pipeline
    pub researcher: Arc<Researcher>,
    /// Run history, the same store the researcher writes to
    pub history: Arc<dyn HistoryStore>,
}

impl AppState {
    /// Create new application state
    pub fn new(settings: Settings, researcher: Researcher, history: Arc<dyn HistoryStore>) -> Self {
        Self {
            settings: Arc::new(settings),
            researcher: Arc::new(researcher),
            history,
        }
    }

    /// Clamp a requested history limit to the configured bounds
    pub fn history_limit(&self, requested: Option<u32>) -> u32 {
        let history = &self.settings.history;
        requested
            .unwrap_or(history.default_limit)
            .clamp(1, history.max_limit.max(1))
    }
}
