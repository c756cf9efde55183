//! Command-line interface definitions for Front Page Digest.
//!
//! Every option can be given as a flag; the search credentials can also come
//! from the environment.

use crate::config::{SchedulePolicy, SearchConfig, parse_date};
use crate::error::Result;
use chrono::NaiveDate;
use clap::Parser;
use std::time::Duration;

/// Command-line arguments for the Front Page Digest binary.
///
/// # Examples
///
/// ```sh
/// # Latest front-page listings for two publishers
/// front_page_digest 023 020
///
/// # A specific edition, front pages only, with summaries
/// NAVER_CLIENT_ID=.. NAVER_CLIENT_SECRET=.. \
///   front_page_digest 023 --date 20240102 --first-page-only --summaries
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Publisher ids to collect (e.g. 023 020 025)
    #[arg(required = true)]
    pub press_ids: Vec<String>,

    /// Edition date as YYYYMMDD; the latest edition when omitted
    #[arg(short, long, value_parser = parse_date_arg)]
    pub date: Option<NaiveDate>,

    /// Keep only front-page entries (1면, A1, A1면, 1)
    #[arg(short, long)]
    pub first_page_only: bool,

    /// Attach search-index summaries to every headline
    #[arg(short, long)]
    pub summaries: bool,

    /// Search API client id
    #[arg(long, env = "NAVER_CLIENT_ID")]
    pub client_id: Option<String>,

    /// Search API client secret
    #[arg(long, env = "NAVER_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Concurrent search calls per batch
    #[arg(long, default_value_t = 5)]
    pub batch_size: usize,

    /// Stagger between search calls inside a batch, in milliseconds
    #[arg(long, default_value_t = 200)]
    pub item_delay_ms: u64,

    /// Pause between batches, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub batch_delay_ms: u64,

    /// Pretty-print the JSON report
    #[arg(long)]
    pub pretty: bool,
}

impl Cli {
    pub fn schedule_policy(&self) -> SchedulePolicy {
        SchedulePolicy {
            batch_size: self.batch_size,
            item_delay: Duration::from_millis(self.item_delay_ms),
            batch_delay: Duration::from_millis(self.batch_delay_ms),
        }
    }

    pub fn search_config(&self) -> Result<SearchConfig> {
        SearchConfig::new(self.client_id.clone(), self.client_secret.clone())
    }
}

fn parse_date_arg(s: &str) -> std::result::Result<NaiveDate, String> {
    parse_date(s).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "front_page_digest",
            "023",
            "020",
            "--date",
            "20240102",
            "--summaries",
            "--client-id",
            "id",
            "--client-secret",
            "secret",
        ]);

        assert_eq!(cli.press_ids, vec!["023", "020"]);
        assert_eq!(cli.date, NaiveDate::from_ymd_opt(2024, 1, 2));
        assert!(cli.summaries);
        assert!(!cli.first_page_only);
        assert_eq!(cli.search_config().unwrap().client_id, "id");
    }

    #[test]
    fn test_cli_short_flags_and_defaults() {
        let cli = Cli::parse_from(["front_page_digest", "-f", "-d", "20231231", "023"]);

        assert!(cli.first_page_only);
        assert_eq!(cli.date, NaiveDate::from_ymd_opt(2023, 12, 31));
        assert_eq!(cli.schedule_policy(), SchedulePolicy::default());
    }

    #[test]
    fn test_cli_rejects_bad_date() {
        let res = Cli::try_parse_from(["front_page_digest", "023", "--date", "2024-01-02"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_cli_requires_press_id() {
        let res = Cli::try_parse_from(["front_page_digest"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_cli_schedule_overrides() {
        let cli = Cli::parse_from([
            "front_page_digest",
            "023",
            "--batch-size",
            "3",
            "--item-delay-ms",
            "50",
            "--batch-delay-ms",
            "0",
        ]);
        let policy = cli.schedule_policy();
        assert_eq!(policy.batch_size, 3);
        assert_eq!(policy.item_delay, Duration::from_millis(50));
        assert_eq!(policy.batch_delay, Duration::ZERO);
    }
}
