use async_trait::async_trait;
use rw_core::{ArticleId, ContentStore, Error, PublishedMetadata, Result, SourceArticle};
use tokio::sync::RwLock;

/// In-process content store. The newest article is the last one added.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    articles: RwLock<Vec<SourceArticle>>,
    published: RwLock<Vec<(ArticleId, PublishedMetadata)>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_articles(articles: Vec<SourceArticle>) -> Self {
        Self {
            articles: RwLock::new(articles),
            published: RwLock::new(Vec::new()),
        }
    }

    /// Seed from a JSON array of articles, as served by the content API.
    pub fn from_json(json: &str) -> Result<Self> {
        let articles: Vec<SourceArticle> = serde_json::from_str(json)?;
        Ok(Self::with_articles(articles))
    }

    /// Every record published so far, oldest first.
    pub async fn published(&self) -> Vec<(ArticleId, PublishedMetadata)> {
        self.published.read().await.clone()
    }
}

#[async_trait]
impl ContentStore for InMemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn fetch_latest(&self) -> Result<SourceArticle> {
        self.articles
            .read()
            .await
            .last()
            .cloned()
            .ok_or_else(|| Error::Storage("No articles in memory store".to_string()))
    }

    async fn publish(&self, id: &ArticleId, record: &PublishedMetadata) -> Result<()> {
        let known = self.articles.read().await.iter().any(|a| &a.id == id);
        if !known {
            return Err(Error::Storage(format!("Unknown article id: {}", id)));
        }
        self.published.write().await.push((id.clone(), record.clone()));
        Ok(())
    }
}
