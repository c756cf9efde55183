//! # Front Page Digest
//!
//! Collects newspaper front-page listings from many publishers and attaches
//! short summaries to each headline by cross-referencing a news search index.
//!
//! ## Architecture
//!
//! 1. **Extraction**: [`scrapers::newspaper`] fetches one publisher's listing
//!    and parses it into page label → articles, tolerating markup variation
//!    through ordered selector cascades. [`scrapers::collect`] runs it for many
//!    publishers concurrently, isolating failures per publisher.
//! 2. **Matching**: [`matcher::SummaryMatcher`] derives a query per headline,
//!    asks the [`search::SearchIndex`] once, scores candidates with
//!    [`similarity::score`] and keeps the best description as the summary.
//!    Calls are paced by [`matcher::BatchScheduler`].
//!
//! [`page_key`] interprets page labels for merging, ordering and front-page
//! detection.

pub mod cli;
pub mod config;
pub mod error;
pub mod matcher;
pub mod models;
pub mod page_key;
pub mod scrapers;
pub mod search;
pub mod similarity;
pub mod utils;

pub use error::{Error, Result};
pub use models::{Article, CollectionReport, MatchReport, MatchStatistics, PressExtractionResult};
