//! Turns an original article plus its references into a rewritten article.
//!
//! The model is asked to answer in a fixed three-field text format:
//!
//! ```text
//! TITLE: <one line>
//! DESCRIPTION: <one line>
//! CONTENT: <HTML, until the end of the reply>
//! ```
//!
//! [`parse_response`] reads that format back. Each field is matched on its own
//! and falls back independently, so a reply that ignores the format entirely
//! still yields a usable result whose content is the whole reply.

use std::sync::Arc;
use lazy_static::lazy_static;
use regex::Regex;
use rw_core::{CompletionModel, CompletionRequest, ReferenceSet, ReferenceText, RewriteResult};
use tracing::{debug, error};

/// Characters of the original article forwarded to the model.
pub const ORIGINAL_EXCERPT_CHARS: usize = 800;

pub const DEFAULT_MAX_TOKENS: u32 = 1500;

pub const SYSTEM_PROMPT: &str = "You are an experienced news editor. Rewrite the article you are \
given into a new, original article with its own structure and wording. Reply using exactly this \
format and nothing else:\n\
TITLE: <a single-line headline>\n\
DESCRIPTION: <a single-sentence summary>\n\
CONTENT: <the full article body as HTML, starting with an <h1> heading>";

lazy_static! {
    // Single-line fields: the value never continues onto the next line.
    static ref TITLE_RE: Regex = Regex::new(r"(?im)^[ \t]*TITLE:[ \t]*(.*)$").unwrap();
    static ref DESCRIPTION_RE: Regex = Regex::new(r"(?im)^[ \t]*DESCRIPTION:[ \t]*(.*)$").unwrap();
    static ref CONTENT_RE: Regex = Regex::new(r"(?is)CONTENT:\s*(.+)").unwrap();
}

/// What the prompt carries besides the original article.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReferencePolicy {
    /// Only the reference URLs, as a comma separated list.
    #[default]
    UrlsOnly,
    /// The URL list followed by every non-empty scraped reference text.
    UrlsAndTexts,
}

pub struct Rewriter {
    model: Arc<dyn CompletionModel>,
    max_tokens: u32,
    policy: ReferencePolicy,
}

impl Rewriter {
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self {
            model,
            max_tokens: DEFAULT_MAX_TOKENS,
            policy: ReferencePolicy::default(),
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_reference_policy(mut self, policy: ReferencePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub fn build_request(
        &self,
        original: &str,
        reference_texts: &[ReferenceText],
        references: &ReferenceSet,
    ) -> CompletionRequest {
        let excerpt: String = original.chars().take(ORIGINAL_EXCERPT_CHARS).collect();
        let mut user = format!(
            "Rewrite the following article as a unique article.\n\nArticle:\n{}\n\nReference sources: {}",
            excerpt,
            references.joined()
        );

        if self.policy == ReferencePolicy::UrlsAndTexts {
            let material: Vec<String> = reference_texts
                .iter()
                .enumerate()
                .filter(|(_, reference)| !reference.is_empty())
                .map(|(i, reference)| format!("[{}] {}\n{}", i + 1, reference.url, reference.text))
                .collect();
            if !material.is_empty() {
                user.push_str("\n\nReference material:\n");
                user.push_str(&material.join("\n\n"));
            }
        }

        CompletionRequest {
            system: SYSTEM_PROMPT.to_string(),
            user,
            max_tokens: self.max_tokens,
        }
    }

    /// Rewrite `original`. Returns `None` when the model call itself failed;
    /// a reply that does not follow the format still produces a result.
    pub async fn rewrite(
        &self,
        original: &str,
        reference_texts: &[ReferenceText],
        references: &ReferenceSet,
    ) -> Option<RewriteResult> {
        let request = self.build_request(original, reference_texts, references);
        debug!(
            "Prompt for {}: {} system chars, {} user chars, max {} tokens",
            self.model.name(),
            request.system.len(),
            request.user.len(),
            request.max_tokens
        );

        match self.model.complete(&request).await {
            Ok(reply) => {
                debug!("Model replied with {} chars", reply.len());
                Some(parse_response(&reply))
            }
            Err(e) => {
                error!("Rewrite with {} failed: {}", self.model.name(), e);
                None
            }
        }
    }
}

/// Split a model reply into title, description and content.
pub fn parse_response(reply: &str) -> RewriteResult {
    let capture = |re: &Regex| {
        re.captures(reply)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
    };
    let line_field = |re: &Regex| capture(re).filter(|value| !value.is_empty());

    RewriteResult {
        title: line_field(&TITLE_RE).unwrap_or_else(|| RewriteResult::DEFAULT_TITLE.to_string()),
        description: line_field(&DESCRIPTION_RE)
            .unwrap_or_else(|| RewriteResult::DEFAULT_DESCRIPTION.to_string()),
        content: capture(&CONTENT_RE).unwrap_or_else(|| reply.to_string()),
    }
}
