//! Front Page Digest binary.
//!
//! Collects the front-page listings of the given publishers, optionally
//! attaches search-index summaries, and prints the JSON report to stdout.
//! Logs go to stderr.
//!
//! ```sh
//! front_page_digest 023 020 --date 20240102 --summaries
//! ```

use clap::Parser;
use front_page_digest::cli::Cli;
use front_page_digest::config::ListingSite;
use front_page_digest::matcher::{SummaryMatcher, attach_to_report};
use front_page_digest::scrapers::{self, newspaper::NewspaperExtractor};
use std::error::Error;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(press_ids = ?args.press_ids, date = ?args.date, summaries = args.summaries, "Parsed CLI arguments");

    let site = ListingSite::naver();

    // Credentials are checked before any publisher is fetched.
    let matcher = if args.summaries {
        Some(
            SummaryMatcher::from_config(args.search_config()?, args.schedule_policy())?
                .with_article_host(&site.article_host),
        )
    } else {
        None
    };

    let extractor = NewspaperExtractor::new(site)?;
    let mut report = scrapers::collect(&extractor, &args.press_ids, args.date).await?;

    if args.first_page_only {
        for result in report.presses.values_mut() {
            result.retain_first_pages();
        }
        report.presses.retain(|press_id, result| {
            if result.is_empty() {
                warn!(%press_id, "No front page found in listing");
            }
            !result.is_empty()
        });
    }

    for (press_id, result) in &report.presses {
        let pages: Vec<&str> = result.sorted_pages().iter().map(|p| p.label.as_str()).collect();
        info!(
            %press_id,
            ?pages,
            articles = result.article_count(),
            front_page_articles = result.first_page_articles().len(),
            "Publisher listing ready"
        );
    }

    if let Some(matcher) = &matcher {
        attach_to_report(matcher, &mut report).await;
    }

    for e in &report.errors {
        warn!(error = %e, "Publisher failed");
    }

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{json}");

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        publishers = report.presses.len(),
        failed = report.errors.len(),
        articles = report.article_count(),
        "Execution complete"
    );
    Ok(())
}
