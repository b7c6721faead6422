use async_trait::async_trait;
use crate::types::{ArticleId, PublishedMetadata, SourceArticle};
use crate::Result;

#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Name of the backend, for logging
    fn name(&self) -> &str;

    /// Fetch the newest article
    async fn fetch_latest(&self) -> Result<SourceArticle>;

    /// Store the rewritten version of an article
    async fn publish(&self, id: &ArticleId, record: &PublishedMetadata) -> Result<()>;
}
