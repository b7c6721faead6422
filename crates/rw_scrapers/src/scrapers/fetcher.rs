use async_trait::async_trait;
use reqwest::Client;
use rw_core::{Error, PageFetcher, Result};
use std::time::Duration;
use tracing::debug;

/// Per-page timeout for reference fetches.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = "Mozilla/5.0 (compatible; ArticleRewriter/0.1)";

/// Plain HTTP GET page loader.
pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeout(FETCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        debug!("Fetching reference page {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Scraping(format!("HTTP {} for {}", status.as_u16(), url)));
        }

        Ok(response.text().await?)
    }
}
