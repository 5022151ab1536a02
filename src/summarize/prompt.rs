//! Prompt templates for summarization

use crate::content::truncate_content;
use crate::results::Document;
use std::fmt::Write;

/// System instruction sent with every summary request
pub const SYSTEM_PROMPT: &str =
    "You are a research assistant that creates concise, accurate summaries.";

const INSTRUCTION: &str = "Please provide a concise summary in 5–10 bullet points.";

/// Build the corpus text from documents in ranking order.
///
/// At most `max_documents` documents are used and each excerpt is cut to
/// `excerpt_chars` characters, which bounds the prompt size.
pub fn build_corpus(documents: &[Document], max_documents: usize, excerpt_chars: usize) -> String {
    let mut corpus = String::new();

    for (i, doc) in documents.iter().take(max_documents).enumerate() {
        let excerpt = truncate_content(&doc.content, excerpt_chars);
        // Writing to a String cannot fail
        let _ = write!(
            corpus,
            "Article {}:\nTitle: {}\nURL: {}\n\nExcerpt: {}\n\n---\n\n",
            i + 1,
            doc.result.title,
            doc.result.url,
            excerpt
        );
    }

    corpus
}

/// Build the user turn combining the query and the corpus
pub fn build_user_prompt(query: &str, corpus: &str) -> String {
    format!("Query: \"{}\"\n\n{}{}", query, corpus, INSTRUCTION)
}
