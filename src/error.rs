//! Error taxonomy shared by the extractor, the matcher and the driver.
//!
//! Failures are scoped to the smallest unit that can fail on its own: a
//! publisher for the extractor, an article for the matcher. Only
//! [`Error::CredentialsMissing`], [`Error::InvalidRequest`] and
//! [`Error::InvalidDate`] abort a whole run.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Transport failure or non-success HTTP status.
    #[error("fetch failed for {url} (status: {}): {message}", display_status(.status))]
    FetchFailed {
        url: String,
        status: Option<u16>,
        message: String,
    },

    #[error("no listing container found for press {press_id} ({selectors_tried} selectors tried)")]
    ContainerNotFound {
        press_id: String,
        selectors_tried: usize,
    },

    #[error("no articles found for press {press_id} (containers: {containers}, blocks: {blocks})")]
    NoArticlesFound {
        press_id: String,
        containers: usize,
        blocks: usize,
    },

    #[error("search API credentials are missing")]
    CredentialsMissing,

    /// The derived search query was empty. Callers treat this as an unmatched outcome.
    #[error("derived search query is empty")]
    EmptyQuery,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid date '{0}', expected YYYYMMDD")]
    InvalidDate(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl Error {
    /// Build a [`Error::FetchFailed`] from a reqwest transport error.
    pub fn fetch(url: &str, err: reqwest::Error) -> Self {
        Error::FetchFailed {
            url: url.to_string(),
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }

    /// True for errors that must abort the whole run rather than one unit.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::CredentialsMissing | Error::InvalidRequest(_) | Error::InvalidDate(_)
        )
    }
}

fn display_status(status: &Option<u16>) -> String {
    status.map_or_else(|| "n/a".to_string(), |s| s.to_string())
}

pub type Result<T> = std::result::Result<T, Error>;
