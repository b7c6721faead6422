use async_trait::async_trait;
use reqwest::Client;
use rw_core::{ArticleId, ContentStore, Error, PublishedMetadata, Result, SourceArticle};
use std::fmt;
use tracing::debug;

use crate::BackendConfig;

/// Content store reached over its HTTP API.
///
/// * `GET  {base}/articles-latest`
/// * `POST {base}/articles/{id}/ai-version`
pub struct HttpStore {
    client: Client,
    base_url: String,
}

impl HttpStore {
    pub fn new(config: BackendConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn latest_url(&self) -> String {
        self.endpoint("articles-latest")
    }

    fn publish_url(&self, id: &ArticleId) -> String {
        self.endpoint(&format!("articles/{}/ai-version", id))
    }
}

impl fmt::Debug for HttpStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpStore")
            .field("client", &"<reqwest::Client>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl ContentStore for HttpStore {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_latest(&self) -> Result<SourceArticle> {
        let url = self.latest_url();
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Storage(format!("GET {} returned {}", url, status)));
        }

        Ok(response.json::<SourceArticle>().await?)
    }

    async fn publish(&self, id: &ArticleId, record: &PublishedMetadata) -> Result<()> {
        let url = self.publish_url(id);
        debug!("POST {} ({} references)", url, record.references.len());

        let response = self.client.post(&url).json(record).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Storage(format!(
                "POST {} returned {}: {}",
                url, status, body
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        let store = HttpStore::new(BackendConfig::new("https://cms.example.com/api/")).unwrap();
        assert_eq!(store.latest_url(), "https://cms.example.com/api/articles-latest");
        assert_eq!(
            store.publish_url(&ArticleId::from("17")),
            "https://cms.example.com/api/articles/17/ai-version"
        );
    }

    #[test]
    fn test_debug_hides_client() {
        let store = HttpStore::new(BackendConfig::new("https://cms.example.com")).unwrap();
        let debug = format!("{:?}", store);
        assert!(debug.contains("cms.example.com"));
        assert!(debug.contains("<reqwest::Client>"));
    }
}
