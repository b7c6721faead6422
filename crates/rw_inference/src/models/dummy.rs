use std::fmt;
use rw_core::{CompletionModel, CompletionRequest, Result};

/// Offline backend. Answers every request in the rewrite format, built from
/// the first words of the user message, so a run can be exercised without
/// credentials.
#[derive(Default)]
pub struct DummyModel;

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl CompletionModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        // Take the first 40 words, minus anything that could open a tag
        let excerpt: String = request
            .user
            .split_whitespace()
            .take(40)
            .collect::<Vec<_>>()
            .join(" ")
            .replace(['<', '>'], "");

        Ok(format!(
            "TITLE: Draft rewrite\nDESCRIPTION: Offline draft generated without a language model.\nCONTENT: <h1>Draft rewrite</h1>\n<p>{}</p>",
            excerpt
        ))
    }
}
