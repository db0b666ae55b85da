// src/search.rs

//! Client for the external web-search API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Bing returns at most this many web results per query here.
const RESULTS_PER_QUERY: &str = "10";

/// One web result as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub link: String,
    pub excerpt: String,
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("search API answered with status {0}")]
    Status(u16),

    #[error("invalid search endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// A source of web search results.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn run_query(&self, query: &str) -> Result<Vec<SearchResult>, SearchError>;
}

/// Bing Web Search v7.
#[derive(Debug, Clone)]
pub struct BingSearch {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl BingSearch {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key,
        }
    }

    fn query_url(&self, query: &str) -> Result<Url, SearchError> {
        let mut url = Url::parse(&self.endpoint)?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("count", RESULTS_PER_QUERY)
            .append_pair("responseFilter", "Webpages");
        Ok(url)
    }
}

#[derive(Deserialize)]
struct BingResponse {
    #[serde(rename = "webPages")]
    web_pages: Option<BingWebPages>,
}

#[derive(Deserialize)]
struct BingWebPages {
    #[serde(default)]
    value: Vec<BingWebPage>,
}

#[derive(Deserialize)]
struct BingWebPage {
    name: String,
    url: String,
    #[serde(default)]
    snippet: String,
}

impl From<BingWebPage> for SearchResult {
    fn from(page: BingWebPage) -> Self {
        Self {
            title: page.name,
            link: page.url,
            excerpt: page.snippet,
        }
    }
}

#[async_trait]
impl SearchProvider for BingSearch {
    async fn run_query(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        let Some(api_key) = &self.api_key else {
            tracing::warn!("BING_API_KEY is not set, search returns no results");
            return Ok(Vec::new());
        };

        let response = self
            .http_client
            .get(self.query_url(query)?)
            .header("Ocp-Apim-Subscription-Key", api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SearchError::Status(response.status().as_u16()));
        }

        let body: BingResponse = response.json().await?;

        Ok(body
            .web_pages
            .map(|pages| pages.value.into_iter().map(SearchResult::from).collect())
            .unwrap_or_default())
    }
}

/// Trims the query and runs it. Blank queries and provider failures yield an
/// empty list; failures are logged.
pub async fn run_query(provider: &dyn SearchProvider, query: &str) -> Vec<SearchResult> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    match provider.run_query(query).await {
        Ok(results) => results,
        Err(e) => {
            tracing::error!("Search for {:?} failed: {}", query, e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_url_encodes_parameters() {
        let bing = BingSearch::new("https://api.bing.microsoft.com/v7.0/search", None);
        let url = bing.query_url("rust & django").unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

        assert_eq!(pairs[0], ("q".to_string(), "rust & django".to_string()));
        assert_eq!(pairs[1], ("count".to_string(), "10".to_string()));
    }

    #[test]
    fn bing_payload_maps_to_results() {
        let body: BingResponse = serde_json::from_value(serde_json::json!({
            "webPages": {
                "value": [
                    { "name": "Rust", "url": "https://www.rust-lang.org/", "snippet": "A language" },
                    { "name": "No snippet", "url": "https://example.com/" }
                ]
            }
        }))
        .unwrap();

        let results: Vec<SearchResult> = body
            .web_pages
            .unwrap()
            .value
            .into_iter()
            .map(SearchResult::from)
            .collect();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Rust");
        assert_eq!(results[0].link, "https://www.rust-lang.org/");
        assert_eq!(results[1].excerpt, "");
    }

    #[tokio::test]
    async fn missing_key_yields_no_results() {
        let bing = BingSearch::new("https://api.bing.microsoft.com/v7.0/search", None);
        assert!(run_query(&bing, "python").await.is_empty());
    }

    #[tokio::test]
    async fn blank_query_is_not_sent() {
        let bing = BingSearch::new("not a url", Some("key".to_string()));
        assert!(run_query(&bing, "   ").await.is_empty());
    }
}
