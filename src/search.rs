//! News search index client.
//!
//! The matcher only needs "give me candidates for this query", so that is
//! the [`SearchIndex`] trait. [`NaverNewsSearch`] implements it over the
//! keyword search HTTP API:
//!
//! ```text
//! GET {endpoint}?query=..&display=10&start=1&sort=sim
//! X-Naver-Client-Id: ..
//! X-Naver-Client-Secret: ..
//! ```
//!
//! Every call is attempted once. Rate limiting is the caller's job (see
//! [`crate::matcher::BatchScheduler`]).

use crate::config::SearchConfig;
use crate::error::{Error, Result};
use crate::models::{MatchCandidate, SearchResponse};
use crate::utils::truncate_for_log;
use reqwest::header::{HeaderMap, HeaderValue};
use std::time::Instant;
use tracing::{debug, instrument, warn};

const CLIENT_ID_HEADER: &str = "x-naver-client-id";
const CLIENT_SECRET_HEADER: &str = "x-naver-client-secret";

/// Source of match candidates for a query.
pub trait SearchIndex {
    /// Candidates for `query`, most relevant first.
    async fn search(&self, query: &str) -> Result<Vec<MatchCandidate>>;
}

/// HTTP client for the news search API.
#[derive(Debug, Clone)]
pub struct NaverNewsSearch {
    client: reqwest::Client,
    config: SearchConfig,
}

impl NaverNewsSearch {
    pub fn new(config: SearchConfig) -> Result<Self> {
        if config.client_id.is_empty() || config.client_secret.is_empty() {
            return Err(Error::CredentialsMissing);
        }
        let header = |v: &str| HeaderValue::from_str(v).map_err(|_| Error::CredentialsMissing);

        let mut headers = HeaderMap::new();
        headers.insert(CLIENT_ID_HEADER, header(&config.client_id)?);
        let mut secret = header(&config.client_secret)?;
        secret.set_sensitive(true);
        headers.insert(CLIENT_SECRET_HEADER, secret);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(Error::HttpClient)?;
        Ok(Self { client, config })
    }
}

impl SearchIndex for NaverNewsSearch {
    #[instrument(level = "debug", skip(self))]
    async fn search(&self, query: &str) -> Result<Vec<MatchCandidate>> {
        if query.trim().is_empty() {
            return Err(Error::EmptyQuery);
        }

        let url = &self.config.endpoint;
        let display = self.config.display.to_string();
        let start = self.config.start.to_string();
        let t0 = Instant::now();
        let response = self
            .client
            .get(url)
            .query(&[
                ("query", query),
                ("display", display.as_str()),
                ("start", start.as_str()),
                ("sort", self.config.sort.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::fetch(url, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                status = status.as_u16(),
                body = %truncate_for_log(&body, 200),
                "Search request returned non-success status"
            );
            return Err(Error::FetchFailed {
                url: url.clone(),
                status: Some(status.as_u16()),
                message: status.canonical_reason().unwrap_or("unexpected status").to_string(),
            });
        }

        let body = response.text().await.map_err(|e| Error::fetch(url, e))?;
        let parsed: SearchResponse = serde_json::from_str(&body)?;
        debug!(
            total = parsed.total,
            returned = parsed.items.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Search request succeeded"
        );
        Ok(parsed.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SearchConfig {
        SearchConfig::new(Some("id".into()), Some("secret".into())).unwrap()
    }

    #[test]
    fn test_new_rejects_blank_credentials() {
        let mut c = config();
        c.client_secret.clear();
        assert!(matches!(NaverNewsSearch::new(c), Err(Error::CredentialsMissing)));
    }

    #[test]
    fn test_new_rejects_credentials_that_are_not_header_safe() {
        let mut c = config();
        c.client_id = "line\nbreak".into();
        assert!(matches!(NaverNewsSearch::new(c), Err(Error::CredentialsMissing)));
    }

    #[tokio::test]
    async fn test_search_rejects_empty_query() {
        let search = NaverNewsSearch::new(config()).unwrap();
        assert!(matches!(search.search("   ").await, Err(Error::EmptyQuery)));
    }

    #[tokio::test]
    async fn test_search_transport_failure_is_fetch_failed() {
        let mut c = config();
        c.endpoint = "http://127.0.0.1:9/v1/search/news.json".into();
        let search = NaverNewsSearch::new(c).unwrap();
        match search.search("삼성전자").await {
            Err(Error::FetchFailed { status, url, .. }) => {
                assert_eq!(status, None);
                assert!(url.ends_with("news.json"));
            }
            other => panic!("expected FetchFailed, got {other:?}"),
        }
    }
}
