//! HTTP networking module
//!
//! Provides the outgoing HTTP client shared by search, extraction and summarization.

mod client;
mod user_agent;

pub use client::{is_timeout, HttpClient};
pub use user_agent::generate_user_agent;
