//! Research Agent: search the web, read the top pages, summarize them
//!
//! A query goes through a search engine, the result pages are fetched and
//! reduced to their main text, and a language model condenses that text
//! into a short bullet summary. Every completed run is kept in SQLite and
//! served back over a small JSON API.

pub mod config;
pub mod content;
pub mod engines;
pub mod history;
pub mod network;
pub mod research;
pub mod results;
pub mod search;
pub mod summarize;
pub mod web;

pub use config::Settings;
pub use engines::Engine;
pub use research::{ResearchError, Researcher};
pub use results::{ResearchRun, SearchResult};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
