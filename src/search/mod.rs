//! Web search module
//!
//! Turns a query into ranked candidates through the configured engine.

mod client;

pub use client::{EngineSearchClient, SearchClient, SearchError};
