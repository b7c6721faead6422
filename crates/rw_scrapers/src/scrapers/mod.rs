use std::sync::Arc;
use std::time::Duration;
use futures::future::join_all;
use rw_core::{PageFetcher, ReferenceSet, ReferenceText};
use tracing::{info, warn};

pub mod extract;
pub mod fetcher;

pub use extract::{extract_main_text, MAX_REFERENCE_CHARS};
pub use fetcher::{HttpPageFetcher, FETCH_TIMEOUT};

/// Turns reference links into bounded plain text.
///
/// A link that cannot be fetched in time, or at all, produces an empty text
/// and never affects the other links.
pub struct ContentScraper {
    fetcher: Arc<dyn PageFetcher>,
    timeout: Duration,
    max_chars: usize,
}

impl ContentScraper {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            fetcher,
            timeout: FETCH_TIMEOUT,
            max_chars: MAX_REFERENCE_CHARS,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn scrape(&self, url: &str) -> String {
        match tokio::time::timeout(self.timeout, self.fetcher.fetch(url)).await {
            Ok(Ok(html)) => extract_main_text(&html, self.max_chars),
            Ok(Err(e)) => {
                warn!("Failed to fetch reference {}: {}", url, e);
                String::new()
            }
            Err(_) => {
                warn!("Timed out after {:?} fetching reference {}", self.timeout, url);
                String::new()
            }
        }
    }

    /// Scrape every reference concurrently. The output is paired with the
    /// input position by position.
    pub async fn scrape_all(&self, references: &ReferenceSet) -> Vec<ReferenceText> {
        let futures = references.iter().map(|url| async move {
            ReferenceText {
                url: url.clone(),
                text: self.scrape(url).await,
            }
        });

        let texts = join_all(futures).await;
        let obtained = texts.iter().filter(|t| !t.is_empty()).count();
        info!("Scraped {}/{} references", obtained, texts.len());
        texts
    }
}
