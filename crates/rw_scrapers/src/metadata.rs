//! Title and description derived from an HTML body.
//!
//! This is a pattern match over the markup, not an HTML parse: the first
//! `<h1>`/`<h2>` gives the title and the first `<p>` gives the description.
//! Nested tags inside the matched element are stripped.

use lazy_static::lazy_static;
use regex::Regex;
use rw_core::{PublishedMetadata, ReferenceSet, RewriteResult};

lazy_static! {
    static ref HEADING_RE: Regex = Regex::new(r"(?is)<h[12]\b[^>]*>(.*?)</h[12]\s*>").unwrap();
    static ref PARAGRAPH_RE: Regex = Regex::new(r"(?is)<p\b[^>]*>(.*?)</p\s*>").unwrap();
    static ref TAG_RE: Regex = Regex::new(r"(?s)<[^>]*>").unwrap();
}

/// Input accepted by [`extract_metadata`].
#[derive(Debug, Clone, Copy)]
pub enum MetadataSource<'a> {
    Html(&'a str),
    Rewrite(&'a RewriteResult),
}

impl<'a> MetadataSource<'a> {
    fn content(self) -> &'a str {
        match self {
            MetadataSource::Html(html) => html,
            MetadataSource::Rewrite(result) => &result.content,
        }
    }
}

impl<'a> From<&'a str> for MetadataSource<'a> {
    fn from(html: &'a str) -> Self {
        MetadataSource::Html(html)
    }
}

impl<'a> From<&'a String> for MetadataSource<'a> {
    fn from(html: &'a String) -> Self {
        MetadataSource::Html(html)
    }
}

impl<'a> From<&'a RewriteResult> for MetadataSource<'a> {
    fn from(result: &'a RewriteResult) -> Self {
        MetadataSource::Rewrite(result)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: String,
}

/// Derive a title and description from HTML content. Never fails; a missing
/// element, or one with no text, is `None`.
pub fn extract_metadata<'a>(source: impl Into<MetadataSource<'a>>) -> ExtractedMetadata {
    let content = source.into().content();
    ExtractedMetadata {
        title: first_inner_text(&HEADING_RE, content),
        description: first_inner_text(&PARAGRAPH_RE, content),
        content: content.to_string(),
    }
}

fn first_inner_text(re: &Regex, html: &str) -> Option<String> {
    let inner = re.captures(html)?.get(1)?.as_str();
    let text = TAG_RE.replace_all(inner, "");
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Build the record to publish. Title and description come from the rewrite
/// when it produced real values, otherwise from the body markup, otherwise
/// the generic defaults.
pub fn build_published(rewrite: RewriteResult, references: &ReferenceSet) -> PublishedMetadata {
    let extracted = extract_metadata(&rewrite);

    let title = rewrite
        .title_if_present()
        .map(str::to_string)
        .or(extracted.title)
        .unwrap_or_else(|| RewriteResult::DEFAULT_TITLE.to_string());
    let description = rewrite
        .description_if_present()
        .map(str::to_string)
        .or(extracted.description)
        .unwrap_or_else(|| RewriteResult::DEFAULT_DESCRIPTION.to_string());

    PublishedMetadata {
        title,
        description,
        content: rewrite.content,
        references: references.to_vec(),
    }
}
