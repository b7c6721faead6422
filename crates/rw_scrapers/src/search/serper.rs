//! Serper web search provider
//!
//! `POST {endpoint}` with `{"q": query}` and the key in an `X-API-KEY` header.
//! Ranked results come back under `organic`, each with a `link`.

use async_trait::async_trait;
use reqwest::Client;
use rw_core::{Error, Result, SearchHit, SearchProvider};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const SERPER_ENDPOINT: &str = "https://google.serper.dev/search";

const SEARCH_TIMEOUT: Duration = Duration::from_secs(15);

pub struct SerperSearch {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl SerperSearch {
    pub fn new(api_key: String, endpoint: Option<String>) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config("No API key configured for serper".to_string()));
        }
        let client = Client::builder().timeout(SEARCH_TIMEOUT).build()?;

        Ok(Self {
            client,
            api_key,
            endpoint: endpoint.unwrap_or_else(|| SERPER_ENDPOINT.to_string()),
        })
    }
}

impl fmt::Debug for SerperSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerperSearch")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[async_trait]
impl SearchProvider for SerperSearch {
    fn name(&self) -> &str {
        "serper"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", &self.api_key)
            .json(&SerperRequest { q: query })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Search(format!(
                "Search API error: {} - {}",
                status.as_u16(),
                message
            )));
        }

        let data: SerperResponse = response.json().await?;
        Ok(data.into_hits())
    }
}

#[derive(Serialize)]
struct SerperRequest<'a> {
    q: &'a str,
}

#[derive(Debug, Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SerperResult>,
}

#[derive(Debug, Deserialize)]
struct SerperResult {
    link: Option<String>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
}

impl SerperResponse {
    fn into_hits(self) -> Vec<SearchHit> {
        self.organic
            .into_iter()
            .filter_map(|r| {
                r.link.map(|link| SearchHit {
                    link,
                    title: r.title,
                    snippet: r.snippet,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_creation() {
        let provider = SerperSearch::new("key".to_string(), None).unwrap();
        assert_eq!(provider.name(), "serper");
        assert_eq!(provider.endpoint, SERPER_ENDPOINT);
        assert!(!format!("{:?}", provider).contains("\"key\""));
    }

    #[test]
    fn test_provider_empty_key() {
        assert!(matches!(
            SerperSearch::new(String::new(), None),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_request_body() {
        let json = serde_json::to_string(&SerperRequest { q: "river floods" }).unwrap();
        assert_eq!(json, r#"{"q":"river floods"}"#);
    }

    #[test]
    fn test_response_keeps_ranking_order() {
        let json = r#"{
            "searchParameters": {"q": "x"},
            "organic": [
                {"title": "First", "link": "https://a.example/1", "snippet": "s1", "position": 1},
                {"title": "No link", "position": 2},
                {"title": "Third", "link": "https://c.example/3", "position": 3}
            ]
        }"#;

        let response: SerperResponse = serde_json::from_str(json).unwrap();
        let hits = response.into_hits();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].link, "https://a.example/1");
        assert_eq!(hits[0].snippet, "s1");
        assert_eq!(hits[1].link, "https://c.example/3");
        assert!(hits[1].snippet.is_empty());
    }

    #[test]
    fn test_response_without_results() {
        let response: SerperResponse = serde_json::from_str(r#"{"answerBox": {}}"#).unwrap();
        assert!(response.into_hits().is_empty());
    }
}
