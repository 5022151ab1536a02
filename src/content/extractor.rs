//! HTML content extraction
//!
//! Reduces a page to its readable text using CSS selectors.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

/// Subtrees that never carry article text
const NOISE_TAGS: &[&str] = &[
    "script",
    "style",
    "nav",
    "footer",
    "header",
    "aside",
    "iframe",
    "noscript",
    "advertisement",
];

/// Content containers, most specific first
static CONTENT_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    ["main", "article", ".content", ".post", ".article", ".main-content"]
        .iter()
        .map(|s| Selector::parse(s).expect("valid selector"))
        .collect()
});

static PARAGRAPH_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p").expect("valid selector"));

/// Extract main content from HTML
///
/// Tries in order:
/// 1. The first content selector with any match (all matches joined)
/// 2. Every `<p>` on the page
/// 3. The whole document
///
/// Noise elements are dropped in every case. The result is
/// whitespace-normalized and cut to `max_chars` characters.
pub fn extract_main_content(html: &str, max_chars: usize) -> String {
    let document = Html::parse_document(html);

    for selector in CONTENT_SELECTORS.iter() {
        let matches: Vec<ElementRef> = document
            .select(selector)
            .filter(|el| !inside_noise(el))
            .collect();
        if matches.is_empty() {
            continue;
        }

        // Nested matches would repeat their text
        let ids: HashSet<_> = matches.iter().map(|m| m.id()).collect();
        let text = matches
            .iter()
            .filter(|m| !m.ancestors().any(|a| ids.contains(&a.id())))
            .map(|m| element_text(m))
            .collect::<Vec<_>>()
            .join(" ");

        return truncate_content(&clean_text(&text), max_chars);
    }

    let paragraphs = document
        .select(&PARAGRAPH_SELECTOR)
        .filter(|p| !inside_noise(p))
        .map(|p| clean_text(&element_text(&p)))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>();

    let text = if paragraphs.is_empty() {
        element_text(&document.root_element())
    } else {
        paragraphs.join(" ")
    };

    truncate_content(&clean_text(&text), max_chars)
}

/// Collect the text under an element, skipping noise subtrees
fn element_text(element: &ElementRef) -> String {
    let mut out = String::new();
    collect_text(element, &mut out);
    out
}

fn collect_text(element: &ElementRef, out: &mut String) {
    for child in element.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            if !is_noise(&child_el) {
                collect_text(&child_el, out);
            }
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
            out.push(' ');
        }
    }
}

fn is_noise(element: &ElementRef) -> bool {
    NOISE_TAGS.contains(&element.value().name())
}

fn inside_noise(element: &ElementRef) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| is_noise(&a))
}

/// Normalize whitespace to single spaces
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cut to `max_chars` characters, marking the cut with `...`
pub fn truncate_content(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
