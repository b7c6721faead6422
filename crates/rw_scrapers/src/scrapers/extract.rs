//! Main-text extraction for reference pages.

use scraper::{ElementRef, Html, Node, Selector};

/// Upper bound, in characters, for one reference text.
pub const MAX_REFERENCE_CHARS: usize = 4000;

/// Containers tried in order; the first one with text wins.
const CONTENT_SELECTORS: [&str; 3] = ["article", "main", "body"];

const SKIPPED_ELEMENTS: [&str; 3] = ["script", "style", "noscript"];

/// Extract the main text of a page: the text of the first non-empty
/// `<article>`, `<main>` or `<body>`, whitespace collapsed, at most
/// `max_chars` characters.
pub fn extract_main_text(html: &str, max_chars: usize) -> String {
    let document = Html::parse_document(html);

    for selector_str in CONTENT_SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        if let Some(element) = document.select(&selector).next() {
            let text = collapse_whitespace(&element_text(&element));
            if !text.is_empty() {
                return truncate_chars(&text, max_chars);
            }
        }
    }

    String::new()
}

/// Text nodes under `element`, skipping script and style bodies.
fn element_text(element: &ElementRef) -> String {
    let mut parts = Vec::new();
    for node in element.descendants() {
        if let Node::Text(text) = node.value() {
            let skipped = node
                .parent()
                .and_then(|parent| parent.value().as_element().map(|e| e.name()))
                .map_or(false, |name| SKIPPED_ELEMENTS.contains(&name));
            if !skipped {
                parts.push(&**text);
            }
        }
    }
    parts.join(" ")
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cut to `max_chars` characters, never inside a UTF-8 sequence.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => text[..end].trim_end().to_string(),
        None => text.to_string(),
    }
}
