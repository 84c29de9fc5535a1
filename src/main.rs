//! # Bisnis Crawler
//!
//! Collects articles from the Bisnis.com index into a deduplicated JSON store.
//!
//! ## Modes
//!
//! - **backfill**: walk an inclusive range of days, scrape every listed
//!   article and overwrite the store
//! - **poll**: fetch the index for the current minute once and append
//!   articles the store has not seen
//! - **watch**: run `poll` on a fixed interval until interrupted
//!
//! ## Usage
//!
//! ```sh
//! bisnis_crawler backfill --start 01-10-2025 --end 07-10-2025
//! bisnis_crawler watch --interval 10 --output data/new_article.json
//! ```
//!
//! ## Architecture
//!
//! 1. **Indexing**: read article URLs from one index page per day or per poll
//! 2. **Fetching**: download each new article sequentially
//! 3. **Extraction**: title, normalized timestamp and body per page
//! 4. **Output**: rewrite the JSON store

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

use bisnis_crawler::cli::{Cli, Command};
use bisnis_crawler::config::CrawlerConfig;
use bisnis_crawler::crawl::backfill::{backfill, DateRange};
use bisnis_crawler::crawl::incremental::poll_now;
use bisnis_crawler::fetch::HttpFetcher;
use bisnis_crawler::scheduler;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("bisnis_crawler starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let base_config = match &args.config {
        Some(path) => CrawlerConfig::load(path).await?,
        None => CrawlerConfig::default(),
    };
    let config = args.apply_overrides(base_config);
    let fetcher = HttpFetcher::new(&config)?;

    match args.command {
        Command::Backfill { start, end, output } => {
            if start > end {
                info!(%start, %end, "Start date is after end date; nothing to crawl");
            }
            let articles = backfill(&fetcher, &config, DateRange::new(start, end), &output).await?;
            info!(count = articles.len(), path = %output.display(), "Backfill written");
        }
        Command::Poll { output } => {
            let added = poll_now(&fetcher, &config, &output).await?;
            info!(added, path = %output.display(), "Poll written");
        }
        Command::Watch {
            interval,
            output,
            immediate,
        } => {
            let (fetcher, config, output) = (&fetcher, &config, output.as_path());
            let period = Duration::from_secs(interval.saturating_mul(60));
            info!(interval_minutes = interval, path = %output.display(), "Watching for new articles");
            scheduler::run_forever(period, immediate, move || async move {
                info!("Polling for new articles");
                match poll_now(fetcher, config, output).await {
                    Ok(added) => info!(added, "Poll tick finished"),
                    Err(e) => error!(error = %e, "Poll tick failed; waiting for next tick"),
                }
            })
            .await;
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
