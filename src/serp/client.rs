use std::env;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use super::types::{SearchRecord, SearchResponse};

const API_BASE: &str = "https://serpapi.com/search";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, thiserror::Error)]
pub enum SerpError {
    #[error("SERP_API_KEY not set. Get one at https://serpapi.com/manage-api-key")]
    ApiKeyNotSet,

    #[error("Search provider error (HTTP {0})")]
    Status(u16),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Abstraction over the web search provider.
/// Implemented by `SerpClient` for production; mock implementations used in tests.
pub trait SearchProvider {
    async fn search(&self, entity: &str, query: &str) -> Result<Vec<SearchRecord>, SerpError>;
}

#[derive(Clone)]
struct ApiKey(String);

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[derive(Clone)]
pub struct SerpClient {
    http: Client,
    api_key: ApiKey,
    base_url: String,
}

impl SerpClient {
    pub fn from_env(http: Client) -> Result<Self, SerpError> {
        let api_key = env::var("SERP_API_KEY").map_err(|_| SerpError::ApiKeyNotSet)?;
        if api_key.trim().is_empty() {
            return Err(SerpError::ApiKeyNotSet);
        }
        Ok(Self {
            http,
            api_key: ApiKey(api_key.trim().to_string()),
            base_url: API_BASE.to_string(),
        })
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            api_key: ApiKey("test-key".to_string()),
            base_url: base_url.to_string(),
        }
    }
}

impl SearchProvider for SerpClient {
    /// Runs one search and tags each organic result with `entity`.
    ///
    /// A missing `organic_results` array is treated as zero results. Any
    /// non-2xx status yields `SerpError::Status`; the caller decides whether
    /// that aborts anything (the pipeline treats it as zero results).
    async fn search(&self, entity: &str, query: &str) -> Result<Vec<SearchRecord>, SerpError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("q", query), ("api_key", self.api_key.0.as_str())])
            .header("User-Agent", crate::USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, query, "search provider returned an error");
            return Err(SerpError::Status(status.as_u16()));
        }

        let body: SearchResponse = response.json().await?;
        let records: Vec<SearchRecord> = body
            .organic_results
            .unwrap_or_default()
            .into_iter()
            .map(|result| SearchRecord {
                entity: entity.to_string(),
                title: result.title,
                snippet: result.snippet,
                url: result.link,
            })
            .collect();

        debug!(entity, hits = records.len(), "search complete");
        Ok(records)
    }
}
