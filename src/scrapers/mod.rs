//! Front-page listing scrapers.
//!
//! [`newspaper`] extracts one publisher's listing. [`collect`] fans it out
//! over many publishers. Each publisher is its own failure unit: a failure
//! is reported as one error line in the [`CollectionReport`] and never touches
//! sibling results.

pub mod newspaper;

use crate::error::{Error, Result};
use crate::models::CollectionReport;
use chrono::NaiveDate;
use futures::future::join_all;
use itertools::Itertools;
use newspaper::NewspaperExtractor;
use std::time::Instant;
use tracing::{error, info, instrument};

/// Extract every publisher in `press_ids` concurrently.
///
/// # Arguments
///
/// * `extractor` - The listing extractor shared by every publisher.
/// * `press_ids` - Publisher ids; trimmed and de-duplicated, first-seen order kept.
/// * `date` - Edition date, or `None` for the latest edition.
///
/// # Returns
///
/// A [`CollectionReport`] with one entry per successful publisher and one
/// `"{id}: {error}"` line per failed one. An empty id list is an
/// [`Error::InvalidRequest`].
#[instrument(level = "info", skip_all, fields(presses = press_ids.len(), date = ?date))]
pub async fn collect(
    extractor: &NewspaperExtractor,
    press_ids: &[String],
    date: Option<NaiveDate>,
) -> Result<CollectionReport> {
    let ids: Vec<&str> = press_ids
        .iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .unique()
        .collect();
    if ids.is_empty() {
        return Err(Error::InvalidRequest("no press id supplied".to_string()));
    }

    let t0 = Instant::now();
    let outcomes = join_all(ids.iter().map(|id| async move {
        (*id, extractor.extract(id, date).await)
    }))
    .await;

    let mut report = CollectionReport::default();
    for (id, outcome) in outcomes {
        match outcome {
            Ok(result) => {
                report.presses.insert(id.to_string(), result);
            }
            Err(e) => {
                error!(press_id = %id, error = %e, "Publisher extraction failed");
                report.errors.push(format!("{id}: {e}"));
            }
        }
    }

    info!(
        succeeded = report.presses.len(),
        failed = report.errors.len(),
        articles = report.article_count(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "Collection complete"
    );
    Ok(report)
}
