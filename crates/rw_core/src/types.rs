use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

/// Identifier assigned by the content store. The store is free to send it as a
/// JSON number or a string, so both are accepted and kept in string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawArticleId", into = "String")]
pub struct ArticleId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawArticleId {
    Number(i64),
    Text(String),
}

impl From<RawArticleId> for ArticleId {
    fn from(raw: RawArticleId) -> Self {
        match raw {
            RawArticleId::Number(n) => Self(n.to_string()),
            RawArticleId::Text(s) => Self(s),
        }
    }
}

impl From<ArticleId> for String {
    fn from(id: ArticleId) -> Self {
        id.0
    }
}

impl From<&str> for ArticleId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl ArticleId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The newest article as served by the content store. Read once per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceArticle {
    pub id: ArticleId,
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// The reference links chosen for one run.
///
/// Built once by the collector and then only read: the same list is scraped,
/// shown to the model and disclosed on publish.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceSet(Vec<String>);

impl ReferenceSet {
    pub fn new(urls: Vec<String>) -> Self {
        Self(urls)
    }

    pub fn urls(&self) -> &[String] {
        &self.0
    }

    /// Comma separated list, in collection order.
    pub fn joined(&self) -> String {
        self.0.join(", ")
    }
}

impl Deref for ReferenceSet {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Text scraped from one reference link. An empty `text` means nothing could
/// be obtained for that link; it is a normal value, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceText {
    pub url: String,
    pub text: String,
}

impl ReferenceText {
    pub fn empty(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            text: String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Structured output of the rewrite step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteResult {
    pub title: String,
    pub description: String,
    /// HTML body of the rewritten article.
    pub content: String,
}

impl RewriteResult {
    pub const DEFAULT_TITLE: &'static str = "Untitled Article";
    pub const DEFAULT_DESCRIPTION: &'static str = "No description available.";

    /// The title, unless it is blank or the generic fallback.
    pub fn title_if_present(&self) -> Option<&str> {
        present(&self.title, Self::DEFAULT_TITLE)
    }

    /// The description, unless it is blank or the generic fallback.
    pub fn description_if_present(&self) -> Option<&str> {
        present(&self.description, Self::DEFAULT_DESCRIPTION)
    }
}

fn present<'a>(value: &'a str, fallback: &str) -> Option<&'a str> {
    let value = value.trim();
    (!value.is_empty() && value != fallback).then_some(value)
}

/// The record written back to the content store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedMetadata {
    pub title: String,
    pub description: String,
    pub content: String,
    /// Sent as a JSON array, never as a string-encoded list.
    pub references: Vec<String>,
}
