//! Explicit configuration for the extractor, the search client and the
//! matcher's scheduling policy.
//!
//! Nothing in the core reads the environment; the CLI builds these structs
//! (from flags or `NAVER_CLIENT_ID` / `NAVER_CLIENT_SECRET`) and passes them in.

use crate::error::{Error, Result};
use chrono::NaiveDate;
use std::time::Duration;

/// Desktop browser identity sent with listing requests.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Where and how to read a publisher's front-page listing.
#[derive(Debug, Clone)]
pub struct ListingSite {
    /// Listing URL with a `{press_id}` placeholder.
    pub listing_url: String,
    /// Scheme and host that article links resolve against.
    pub article_host: String,
    /// Path prefixes that identify article links on `article_host`.
    pub article_paths: Vec<String>,
    /// Listing container selectors, tried in order.
    pub container_selectors: Vec<String>,
    pub timeout: Duration,
}

impl ListingSite {
    pub fn naver() -> Self {
        Self {
            listing_url: "https://media.naver.com/press/{press_id}/newspaper".to_string(),
            article_host: "https://n.news.naver.com".to_string(),
            article_paths: vec!["/article/".to_string(), "/mnews/article/".to_string()],
            container_selectors: vec![
                ".newspaper_wrp".to_string(),
                ".newspaper_inner".to_string(),
                ".press_newspaper".to_string(),
                "div[class*=newspaper]".to_string(),
            ],
            timeout: Duration::from_secs(20),
        }
    }

    /// Listing URL for `press_id`, with `?date=YYYYMMDD` when a date is given.
    pub fn listing_url_for(&self, press_id: &str, date: Option<NaiveDate>) -> String {
        let base = self.listing_url.replace("{press_id}", press_id);
        match date {
            Some(d) => format!("{}?date={}", base, d.format("%Y%m%d")),
            None => base,
        }
    }
}

impl Default for ListingSite {
    fn default() -> Self {
        Self::naver()
    }
}

/// Result ordering accepted by the search service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchSort {
    /// Relevance.
    #[default]
    Sim,
    Date,
}

impl SearchSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchSort::Sim => "sim",
            SearchSort::Date => "date",
        }
    }
}

/// Credentials and paging parameters for the news search service.
#[derive(Clone)]
pub struct SearchConfig {
    pub endpoint: String,
    pub client_id: String,
    pub client_secret: String,
    pub display: u32,
    pub start: u32,
    pub sort: SearchSort,
    pub timeout: Duration,
}

impl SearchConfig {
    pub const DEFAULT_ENDPOINT: &'static str = "https://openapi.naver.com/v1/search/news.json";

    /// Fails with [`Error::CredentialsMissing`] if either credential is absent or blank.
    pub fn new(client_id: Option<String>, client_secret: Option<String>) -> Result<Self> {
        let client_id = client_id.map(|s| s.trim().to_string()).unwrap_or_default();
        let client_secret = client_secret.map(|s| s.trim().to_string()).unwrap_or_default();
        if client_id.is_empty() || client_secret.is_empty() {
            return Err(Error::CredentialsMissing);
        }
        Ok(Self {
            endpoint: Self::DEFAULT_ENDPOINT.to_string(),
            client_id,
            client_secret,
            display: 10,
            start: 1,
            sort: SearchSort::Sim,
            timeout: Duration::from_secs(10),
        })
    }
}

// Hand-written so the secret never lands in logs.
impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("endpoint", &self.endpoint)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("display", &self.display)
            .field("start", &self.start)
            .field("sort", &self.sort)
            .finish()
    }
}

/// Backpressure policy for the summary matcher.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulePolicy {
    /// Maximum concurrent search calls; also the batch length.
    pub batch_size: usize,
    /// Stagger between consecutive starts inside a batch.
    pub item_delay: Duration,
    /// Pause between two batches.
    pub batch_delay: Duration,
}

impl Default for SchedulePolicy {
    fn default() -> Self {
        Self {
            batch_size: 5,
            item_delay: Duration::from_millis(200),
            batch_delay: Duration::from_millis(1000),
        }
    }
}

/// Parse a `YYYYMMDD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    if s.len() != 8 || !s.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::InvalidDate(s.to_string()));
    }
    NaiveDate::parse_from_str(s, "%Y%m%d").map_err(|_| Error::InvalidDate(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_url_without_date() {
        let site = ListingSite::naver();
        assert_eq!(
            site.listing_url_for("023", None),
            "https://media.naver.com/press/023/newspaper"
        );
    }

    #[test]
    fn test_listing_url_with_date() {
        let site = ListingSite::naver();
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(
            site.listing_url_for("023", Some(date)),
            "https://media.naver.com/press/023/newspaper?date=20240305"
        );
    }

    #[test]
    fn test_search_config_requires_both_credentials() {
        assert!(matches!(
            SearchConfig::new(None, Some("secret".into())),
            Err(Error::CredentialsMissing)
        ));
        assert!(matches!(
            SearchConfig::new(Some("id".into()), Some("   ".into())),
            Err(Error::CredentialsMissing)
        ));
        let config = SearchConfig::new(Some("id".into()), Some("secret".into())).unwrap();
        assert_eq!(config.display, 10);
        assert_eq!(config.sort.as_str(), "sim");
    }

    #[test]
    fn test_search_config_debug_hides_secret() {
        let config = SearchConfig::new(Some("id".into()), Some("hunter2".into())).unwrap();
        let dbg = format!("{config:?}");
        assert!(!dbg.contains("hunter2"));
    }

    #[test]
    fn test_default_schedule_policy() {
        let policy = SchedulePolicy::default();
        assert_eq!(policy.batch_size, 5);
        assert_eq!(policy.item_delay, Duration::from_millis(200));
        assert_eq!(policy.batch_delay, Duration::from_millis(1000));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("20240229").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(matches!(parse_date("20230229"), Err(Error::InvalidDate(_))));
        assert!(matches!(parse_date("2024-02-29"), Err(Error::InvalidDate(_))));
        assert!(matches!(parse_date(""), Err(Error::InvalidDate(_))));
    }
}
