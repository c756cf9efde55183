//! Data models for front-page listings and search-index matching.
//!
//! - [`Article`]: one headline on one page of a publisher's edition
//! - [`PressExtractionResult`]: the ordered page → articles mapping for one publisher
//! - [`MatchCandidate`] / [`SearchResponse`]: items returned by the search index
//! - [`MatchStatistics`]: aggregate counts from one matcher run
//! - [`CollectionReport`]: results and per-publisher errors for a multi-publisher run

use crate::page_key::{compare_labels, is_first_page, normalize_key};
use indexmap::IndexMap;
use itertools::Itertools;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// A headline scraped from a publisher's front-page listing.
///
/// `title` and `link` never change after extraction. `summary` and `matched`
/// stay `None` until the summary matcher runs; `matched == Some(true)` always
/// comes with a non-empty summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    /// Absolute article URL.
    pub link: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub matched: Option<bool>,
}

impl Article {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            summary: None,
            matched: None,
        }
    }

    /// Record a successful pairing. An empty summary counts as no match.
    pub fn set_matched(&mut self, summary: String) {
        if summary.is_empty() {
            self.set_unmatched();
        } else {
            self.summary = Some(summary);
            self.matched = Some(true);
        }
    }

    pub fn set_unmatched(&mut self) {
        self.summary = None;
        self.matched = Some(false);
    }
}

/// One physical page of an edition: the label as it appeared in the source
/// and the articles listed under it, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageEntry {
    pub label: String,
    pub articles: Vec<Article>,
}

/// Page label → articles for one publisher fetch.
///
/// Keys are [`normalize_key`] forms of the labels, so a page appears at most
/// once; blocks sharing a key append to the first entry, which keeps its
/// position. Serializes as a JSON object of `label → [article]` in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PressExtractionResult {
    pages: IndexMap<String, PageEntry>,
}

impl PressExtractionResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `articles` under `label`, merging with any page sharing its normalized key.
    pub fn merge_page(&mut self, label: &str, articles: Vec<Article>) {
        if articles.is_empty() {
            return;
        }
        let entry = self
            .pages
            .entry(normalize_key(label))
            .or_insert_with(|| PageEntry {
                label: label.trim().to_string(),
                articles: Vec::new(),
            });
        entry.articles.extend(articles);
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Number of pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn article_count(&self) -> usize {
        self.pages.values().map(|p| p.articles.len()).sum()
    }

    /// Articles listed under `label`, matched by normalized key.
    pub fn get(&self, label: &str) -> Option<&[Article]> {
        self.pages
            .get(&normalize_key(label))
            .map(|p| p.articles.as_slice())
    }

    /// Pages in document order.
    pub fn pages(&self) -> impl Iterator<Item = &PageEntry> {
        self.pages.values()
    }

    pub fn pages_mut(&mut self) -> impl Iterator<Item = &mut PageEntry> {
        self.pages.values_mut()
    }

    /// Pages ordered by page rank, ties broken by label.
    pub fn sorted_pages(&self) -> Vec<&PageEntry> {
        self.pages
            .values()
            .sorted_by(|a, b| compare_labels(&a.label, &b.label))
            .collect()
    }

    /// Articles from the edition's front page(s), in document order.
    pub fn first_page_articles(&self) -> Vec<&Article> {
        self.pages
            .values()
            .filter(|p| is_first_page(&p.label))
            .flat_map(|p| p.articles.iter())
            .collect()
    }

    /// Keep only front-page entries.
    pub fn retain_first_pages(&mut self) {
        self.pages.retain(|_, p| is_first_page(&p.label));
    }
}

impl Serialize for PressExtractionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.pages.len()))?;
        for page in self.pages.values() {
            map.serialize_entry(&page.label, &page.articles)?;
        }
        map.end()
    }
}

/// A search-index item considered while matching one headline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCandidate {
    #[serde(default)]
    pub title: String,
    #[serde(rename = "originallink", default)]
    pub original_link: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "pubDate", default)]
    pub pub_date: String,
}

impl MatchCandidate {
    /// Link used for domain comparison: the publisher's original link, or the
    /// index-hosted link when the index did not provide one.
    pub fn comparable_link(&self) -> &str {
        if self.original_link.is_empty() {
            &self.link
        } else {
            &self.original_link
        }
    }
}

/// JSON body returned by the keyword search service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub items: Vec<MatchCandidate>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub start: u32,
    #[serde(default)]
    pub display: u32,
}

/// Aggregate counts for one matcher run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchStatistics {
    pub total: usize,
    pub matched: usize,
    pub unmatched: usize,
    /// Percentage with one decimal, e.g. `"25.0"`.
    pub match_rate: String,
}

impl MatchStatistics {
    pub fn from_articles(articles: &[Article]) -> Self {
        let total = articles.len();
        let matched = articles.iter().filter(|a| a.matched == Some(true)).count();
        Self {
            total,
            matched,
            unmatched: total - matched,
            match_rate: match_rate(matched, total),
        }
    }
}

/// `matched / total * 100` with one decimal; `"0.0"` when `total` is zero.
pub fn match_rate(matched: usize, total: usize) -> String {
    if total == 0 {
        return "0.0".to_string();
    }
    format!("{:.1}", matched as f64 / total as f64 * 100.0)
}

/// Output of a matcher run: the input articles in input order plus statistics.
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub articles: Vec<Article>,
    pub statistics: MatchStatistics,
}

/// Results of a multi-publisher collection run.
///
/// A failed publisher contributes one line to `errors` and nothing to `presses`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionReport {
    pub presses: IndexMap<String, PressExtractionResult>,
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<MatchStatistics>,
}

impl CollectionReport {
    pub fn article_count(&self) -> usize {
        self.presses.values().map(|r| r.article_count()).sum()
    }
}
