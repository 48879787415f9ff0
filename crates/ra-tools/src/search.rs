//! Web Search Provider
//!
//! ## API Endpoints
//!
//! | Endpoint | URL | Purpose |
//! |----------|-----|--------|
//! | Web search | `https://api.bing.microsoft.com/v7.0/search` | Ranked web results |
//!
//! ## Authentication
//! - Header: `Ocp-Apim-Subscription-Key: {BING_SEARCH_API_KEY}`
//!
//! Requests never ask for more than [`MAX_SEARCH_RESULTS`] results.

use async_trait::async_trait;
use ra_core::{Error, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

pub const MAX_SEARCH_RESULTS: u32 = 10;
pub const DEFAULT_NUM_RESULTS: u32 = 5;

pub mod endpoints {
    pub const AUTH_HEADER: &str = "Ocp-Apim-Subscription-Key";
}

/// One ranked web result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Results for one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub query: String,
    pub results: Vec<SearchResult>,
    pub total_results: usize,
}

/// Keyword web search
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Search the web. Implementations cap `num_results` at [`MAX_SEARCH_RESULTS`].
    async fn search(&self, query: &str, num_results: u32) -> Result<SearchResults>;
}

/// Clamp a requested result count into `1..=MAX_SEARCH_RESULTS`
pub fn capped_count(num_results: u32) -> u32 {
    num_results.clamp(1, MAX_SEARCH_RESULTS)
}

#[derive(Debug, Deserialize)]
struct BingResponse {
    #[serde(rename = "webPages", default)]
    web_pages: Option<BingWebPages>,
}

#[derive(Debug, Deserialize)]
struct BingWebPages {
    #[serde(default)]
    value: Vec<BingWebPage>,
}

#[derive(Debug, Deserialize)]
struct BingWebPage {
    name: String,
    url: String,
    #[serde(default)]
    snippet: String,
}

/// Bing Web Search v7 client
pub struct BingSearchClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl BingSearchClient {
    /// Create a client for the search endpoint, e.g. `https://api.bing.microsoft.com/v7.0/search`
    pub fn with_endpoint(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }
}

fn transport_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::timeout(format!("web search timed out: {}", e))
    } else {
        Error::transport(format!("web search request failed: {}", e))
    }
}

#[async_trait]
impl SearchProvider for BingSearchClient {
    async fn search(&self, query: &str, num_results: u32) -> Result<SearchResults> {
        let count = capped_count(num_results);
        let count_param = count.to_string();
        info!("Web search: query={:?}, count={}", query, count);

        let response = self
            .client
            .get(&self.endpoint)
            .header(endpoints::AUTH_HEADER, &self.api_key)
            .query(&[
                ("q", query),
                ("count", count_param.as_str()),
                ("textDecorations", "false"),
                ("textFormat", "Raw"),
            ])
            .send()
            .await
            .map_err(|e| {
                let err = transport_error(e);
                if err.is_timeout() {
                    warn!("Web search timed out for {:?}", query);
                } else {
                    warn!("Web search transport failure for {:?}: {}", query, err);
                }
                err
            })?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            warn!("Web search returned HTTP {}", status);
            return Err(Error::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: BingResponse = serde_json::from_str(&body)?;
        let results: Vec<SearchResult> = parsed
            .web_pages
            .map(|pages| pages.value)
            .unwrap_or_default()
            .into_iter()
            .take(count as usize)
            .map(|page| SearchResult {
                title: page.name,
                url: page.url,
                snippet: page.snippet,
            })
            .collect();

        debug!("Web search returned {} result(s)", results.len());

        Ok(SearchResults {
            query: query.to_string(),
            total_results: results.len(),
            results,
        })
    }
}
