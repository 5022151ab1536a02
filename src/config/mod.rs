//! Configuration module
//!
//! Handles loading settings from YAML files, `.env` and environment variables.

mod settings;

pub use settings::*;

use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

/// Load settings from file or use defaults, then apply environment overrides
pub fn load() -> Result<Settings> {
    // Missing .env is fine
    let _ = dotenv::dotenv();

    let mut settings = match find_settings_file() {
        Some(path) => {
            info!("Loading settings from: {}", path.display());
            Settings::from_file(&path)?
        }
        None => {
            info!("No settings file found, using defaults");
            Settings::default()
        }
    };
    settings.merge_env();
    Ok(settings)
}

/// Settings file locations, environment variable first
fn find_settings_file() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("RESEARCH_SETTINGS_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    let mut paths = vec![
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("research-agent/settings.yml"));
    }

    paths.into_iter().find(|p| p.exists())
}
