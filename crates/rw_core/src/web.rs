use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::Result;

/// One ranked entry returned by a search provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub link: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub snippet: String,
}

#[async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Run a web search, results in the provider's ranking order
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>>;
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the raw HTML of a page. Non-2xx responses are errors.
    async fn fetch(&self, url: &str) -> Result<String>;
}
