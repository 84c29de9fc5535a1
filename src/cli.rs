//! Command-line interface definitions.
//!
//! Connection settings can come from flags, environment variables or a YAML
//! file given with `--config`; flags and environment win over the file.

use crate::config::CrawlerConfig;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Store used by `poll` and `watch` when `--output` is not given.
pub const DEFAULT_INCREMENTAL_STORE: &str = "data/new_article.json";

/// Store used by `backfill` when `--output` is not given.
pub const DEFAULT_BACKFILL_STORE: &str = "data/backfill.json";

/// Longest accepted `watch --interval`, one week in minutes.
pub const MAX_INTERVAL_MINUTES: u64 = 7 * 24 * 60;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Articles published 1 to 7 October 2025
/// bisnis_crawler backfill --start 01-10-2025 --end 07-10-2025 -o data/oktober.json
///
/// # One incremental poll
/// bisnis_crawler poll
///
/// # Poll every 10 minutes until interrupted
/// bisnis_crawler watch --interval 10
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Index page URL, without query string
    #[arg(long, env = "BISNIS_INDEX_URL", global = true)]
    pub index_url: Option<String>,

    /// User-Agent header sent with every request
    #[arg(long, env = "BISNIS_USER_AGENT", global = true)]
    pub user_agent: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, env = "BISNIS_TIMEOUT_SECS", global = true)]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Crawl every day in an inclusive date range and overwrite the store
    Backfill {
        /// First day, as DD-MM-YYYY or YYYY-MM-DD
        #[arg(short, long, value_parser = parse_date)]
        start: NaiveDate,

        /// Last day, as DD-MM-YYYY or YYYY-MM-DD
        #[arg(short, long, value_parser = parse_date)]
        end: NaiveDate,

        /// Store file to write
        #[arg(short, long, default_value = DEFAULT_BACKFILL_STORE)]
        output: PathBuf,
    },

    /// Poll the current index once and append new articles to the store
    Poll {
        /// Store file to merge into
        #[arg(short, long, default_value = DEFAULT_INCREMENTAL_STORE)]
        output: PathBuf,
    },

    /// Poll on a fixed interval until interrupted
    Watch {
        /// Minutes between polls, at most one week
        #[arg(
            short,
            long,
            default_value_t = 10,
            value_parser = clap::value_parser!(u64).range(1..=MAX_INTERVAL_MINUTES)
        )]
        interval: u64,

        /// Store file to merge into
        #[arg(short, long, default_value = DEFAULT_INCREMENTAL_STORE)]
        output: PathBuf,

        /// Also poll once at start-up instead of waiting a full interval
        #[arg(long)]
        immediate: bool,
    },
}

/// Parse a calendar date in `DD-MM-YYYY` or `YYYY-MM-DD` form.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%d-%m-%Y")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .map_err(|_| format!("invalid date `{s}`; expected DD-MM-YYYY or YYYY-MM-DD"))
}

impl Cli {
    /// Overlay flag and environment values onto `config`.
    pub fn apply_overrides(&self, mut config: CrawlerConfig) -> CrawlerConfig {
        if let Some(index_url) = &self.index_url {
            config.index_url = index_url.clone();
        }
        if let Some(user_agent) = &self.user_agent {
            config.user_agent = user_agent.clone();
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.timeout_secs = timeout_secs;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_backfill_parsing() {
        let cli = Cli::parse_from([
            "bisnis_crawler",
            "backfill",
            "--start",
            "01-10-2025",
            "--end",
            "2025-10-07",
            "--output",
            "/tmp/oktober.json",
        ]);
        assert_eq!(
            cli.command,
            Command::Backfill {
                start: day(2025, 10, 1),
                end: day(2025, 10, 7),
                output: PathBuf::from("/tmp/oktober.json"),
            }
        );
    }

    #[test]
    fn test_backfill_default_output() {
        let cli = Cli::parse_from(["bisnis_crawler", "backfill", "-s", "05-10-2025", "-e", "05-10-2025"]);
        match cli.command {
            Command::Backfill { output, .. } => assert_eq!(output, PathBuf::from(DEFAULT_BACKFILL_STORE)),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        let result = Cli::try_parse_from(["bisnis_crawler", "backfill", "-s", "31-02-2025", "-e", "01-03-2025"]);
        assert!(result.is_err());
        assert!(parse_date("yesterday").is_err());
    }

    #[test]
    fn test_watch_defaults() {
        let cli = Cli::parse_from(["bisnis_crawler", "watch"]);
        assert_eq!(
            cli.command,
            Command::Watch {
                interval: 10,
                output: PathBuf::from(DEFAULT_INCREMENTAL_STORE),
                immediate: false,
            }
        );
    }

    #[test]
    fn test_watch_rejects_zero_interval() {
        assert!(Cli::try_parse_from(["bisnis_crawler", "watch", "--interval", "0"]).is_err());
    }

    #[test]
    fn test_watch_interval_is_capped_at_one_week() {
        let cli = Cli::parse_from(["bisnis_crawler", "watch", "--interval", "10080"]);
        assert!(matches!(cli.command, Command::Watch { interval: MAX_INTERVAL_MINUTES, .. }));

        for too_long in ["10081", "18446744073709551615"] {
            assert!(Cli::try_parse_from(["bisnis_crawler", "watch", "--interval", too_long]).is_err());
        }
    }

    #[test]
    fn test_global_flags_override_config() {
        let cli = Cli::parse_from([
            "bisnis_crawler",
            "poll",
            "--index-url",
            "http://localhost:8080/index",
            "--timeout-secs",
            "3",
        ]);
        let config = cli.apply_overrides(CrawlerConfig::default());
        assert_eq!(config.index_url, "http://localhost:8080/index");
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.user_agent, crate::config::DEFAULT_USER_AGENT);
    }
}
