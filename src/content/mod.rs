//! Page content module
//!
//! Fetches candidate pages and reduces them to plain text for summarization.

mod extractor;
mod fetcher;

pub use extractor::{clean_text, extract_main_content, truncate_content};
pub use fetcher::{ContentFetcher, Extractor, FetchError};
