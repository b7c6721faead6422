use async_trait::async_trait;
use std::fmt;
use crate::Result;

/// A single chat-style completion: one system message, one user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
}

#[async_trait]
pub trait CompletionModel: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Run the completion and return the text of the first choice
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}
