//! Summary matcher: pairs scraped headlines with search-index items.
//!
//! For every article a query is derived from the title, the search index is
//! asked once, every candidate is scored against the headline and the best
//! one at or above the threshold donates its description as the summary.
//!
//! # Scheduling
//!
//! The search API is rate limited, so calls go through a [`BatchScheduler`]:
//!
//! ```text
//! batch 0: item0 ─ +200ms item1 ─ +200ms item2 ...   (≤ batch_size in flight)
//!          ── wait for the whole batch ──
//!          ── 1000ms ──
//! batch 1: ...
//! ```
//!
//! # Failure isolation
//!
//! A failed or empty query marks that one article unmatched. Nothing aborts
//! the run, and output order always equals input order.

use crate::config::{ListingSite, SchedulePolicy, SearchConfig};
use crate::error::{Error, Result};
use crate::models::{Article, CollectionReport, MatchReport, MatchStatistics};
use crate::search::{NaverNewsSearch, SearchIndex};
use crate::similarity::{best_match, domain_of};
use crate::utils::{clean_description, derive_query, truncate_for_log};
use futures::future::join_all;
use std::future::Future;
use std::time::Instant;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// Runs work in sequential, bounded batches.
///
/// At most `batch_size` futures are in flight; item *i* of a batch starts
/// `i × item_delay` after the batch does, and consecutive batches are
/// separated by `batch_delay`. Results come back in input order.
#[derive(Debug, Clone, Copy)]
pub struct BatchScheduler {
    policy: SchedulePolicy,
}

impl BatchScheduler {
    pub fn new(policy: SchedulePolicy) -> Self {
        Self {
            policy: SchedulePolicy {
                batch_size: policy.batch_size.max(1),
                ..policy
            },
        }
    }

    pub fn policy(&self) -> SchedulePolicy {
        self.policy
    }

    pub async fn run<T, R, F, Fut>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        F: Fn(T) -> Fut,
        Fut: Future<Output = R>,
    {
        let total = items.len();
        let mut results = Vec::with_capacity(total);
        let mut remaining = items.into_iter();
        let f = &f;

        for batch_no in 0.. {
            let batch: Vec<T> = remaining.by_ref().take(self.policy.batch_size).collect();
            if batch.is_empty() {
                break;
            }
            if batch_no > 0 {
                sleep(self.policy.batch_delay).await;
            }

            debug!(batch = batch_no, size = batch.len(), total, "Starting batch");
            let item_delay = self.policy.item_delay;
            let pending = batch.into_iter().enumerate().map(|(i, item)| async move {
                let offset = item_delay * i as u32;
                if !offset.is_zero() {
                    sleep(offset).await;
                }
                f(item).await
            });
            results.extend(join_all(pending).await);
        }
        results
    }
}

impl Default for BatchScheduler {
    fn default() -> Self {
        Self::new(SchedulePolicy::default())
    }
}

/// Attaches search-index summaries to articles.
#[derive(Debug)]
pub struct SummaryMatcher<S> {
    index: S,
    scheduler: BatchScheduler,
    /// Domain shared by scraped links; never counts as a same-domain signal.
    aggregator_domain: Option<String>,
}

impl SummaryMatcher<NaverNewsSearch> {
    /// Matcher over the HTTP search API. Missing credentials are fatal here,
    /// before any article is touched.
    pub fn from_config(config: SearchConfig, policy: SchedulePolicy) -> Result<Self> {
        Ok(Self::new(NaverNewsSearch::new(config)?, policy))
    }
}

impl<S: SearchIndex> SummaryMatcher<S> {
    /// Matcher over `index`, assuming articles were scraped from the default
    /// [`ListingSite`]. Use [`Self::with_article_host`] for another site.
    pub fn new(index: S, policy: SchedulePolicy) -> Self {
        Self {
            index,
            scheduler: BatchScheduler::new(policy),
            aggregator_domain: domain_of(&ListingSite::default().article_host),
        }
    }

    /// Set the article host the scraped links live on (e.g. `https://n.news.naver.com`).
    pub fn with_article_host(mut self, article_host: &str) -> Self {
        self.aggregator_domain = domain_of(article_host);
        self
    }

    pub fn index(&self) -> &S {
        &self.index
    }

    /// Set `summary`/`matched` on every article and report aggregate counts.
    ///
    /// The output has the same length and order as `articles`.
    #[instrument(level = "info", skip_all, fields(total = articles.len()))]
    pub async fn attach_summaries(&self, articles: Vec<Article>) -> MatchReport {
        let t0 = Instant::now();
        let articles = self
            .scheduler
            .run(articles, |article| self.match_article(article))
            .await;
        let statistics = MatchStatistics::from_articles(&articles);

        info!(
            total = statistics.total,
            matched = statistics.matched,
            unmatched = statistics.unmatched,
            match_rate = %statistics.match_rate,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Summary matching complete"
        );
        MatchReport {
            articles,
            statistics,
        }
    }

    async fn match_article(&self, mut article: Article) -> Article {
        match self.find_summary(&article).await {
            Ok(Some(summary)) => article.set_matched(summary),
            Ok(None) => {
                debug!(title = %article.title, "No candidate above threshold");
                article.set_unmatched();
            }
            Err(Error::EmptyQuery) => {
                debug!(title = %article.title, "Empty search query; skipping lookup");
                article.set_unmatched();
            }
            Err(e) => {
                warn!(title = %truncate_for_log(&article.title, 80), error = %e, "Summary lookup failed");
                article.set_unmatched();
            }
        }
        article
    }

    async fn find_summary(&self, article: &Article) -> Result<Option<String>> {
        let query = derive_query(&article.title);
        if query.is_empty() {
            return Err(Error::EmptyQuery);
        }

        let candidates = self.index.search(&query).await?;
        let Some((idx, score)) = best_match(
            &article.title,
            &article.link,
            &candidates,
            self.aggregator_domain.as_deref(),
        ) else {
            return Ok(None);
        };
        debug!(%query, score, candidates = candidates.len(), "Selected candidate");
        Ok(Some(clean_description(&candidates[idx].description)))
    }
}

/// Run the matcher over every article in `report` and write the results back
/// in place.
///
/// # Arguments
///
/// * `matcher` - The configured summary matcher.
/// * `report` - A collection report; every article in it is updated.
///
/// # Returns
///
/// The run's [`MatchStatistics`], also stored in `report.statistics`.
/// Articles are visited in press → page → article order.
pub async fn attach_to_report<S: SearchIndex>(
    matcher: &SummaryMatcher<S>,
    report: &mut CollectionReport,
) -> MatchStatistics {
    let articles: Vec<Article> = report
        .presses
        .values()
        .flat_map(|r| r.pages())
        .flat_map(|p| p.articles.iter().cloned())
        .collect();

    let matched = matcher.attach_summaries(articles).await;

    let slots = report
        .presses
        .values_mut()
        .flat_map(|r| r.pages_mut())
        .flat_map(|p| p.articles.iter_mut());
    for (slot, article) in slots.zip(matched.articles) {
        *slot = article;
    }

    report.statistics = Some(matched.statistics.clone());
    matched.statistics
}
