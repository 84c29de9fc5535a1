//! Historical backfill over a range of days.
//!
//! The run has two stages:
//!
//! 1. [`discover_links`]: fetch one index page per day and deduplicate the
//!    combined links, keeping first-seen order
//! 2. [`scrape_links`]: fetch each surviving article in order
//!
//! The first fetch failure aborts the whole run and nothing is written. On
//! success the store is overwritten with exactly the scraped articles.

use super::index_url;
use crate::config::CrawlerConfig;
use crate::error::{CrawlError, FetchError};
use crate::fetch::Fetch;
use crate::models::Article;
use crate::outputs::json::write_articles;
use crate::scrapers::bisnis::{fetch_article, index_articles};
use chrono::NaiveDate;
use futures::stream::{self, StreamExt, TryStreamExt};
use itertools::Itertools;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Inclusive span of calendar days. A range whose start is after its end
/// contains no days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }
}

/// Index URL for one day; the service expects a midnight datetime.
pub fn day_index_url(base: &str, day: NaiveDate) -> String {
    index_url(base, &day.format("%Y-%m-%d 00:00:00").to_string())
}

/// Drop repeated links, keeping the first occurrence of each.
pub fn dedup_links(links: Vec<String>) -> Vec<String> {
    links.into_iter().unique().collect()
}

/// Walk every day in `range` and return the deduplicated article links.
///
/// # Arguments
///
/// * `fetcher` - Source of the index pages
/// * `config` - Supplies the index base URL
/// * `range` - Days to visit, start to end inclusive
///
/// # Returns
///
/// Every listed link once, in the order first seen. An empty range gives an
/// empty vector without any request.
///
/// # Errors
///
/// The first index page that cannot be fetched ends the walk.
#[instrument(level = "info", skip(fetcher, config))]
pub async fn discover_links<F: Fetch>(
    fetcher: &F,
    config: &CrawlerConfig,
    range: DateRange,
) -> Result<Vec<String>, CrawlError> {
    let mut links = Vec::new();
    for day in range.days() {
        let url = day_index_url(&config.index_url, day);
        info!(%day, %url, "Crawling index");
        links.extend(index_articles(fetcher, &url).await?);
    }

    let found = links.len();
    let links = dedup_links(links);
    info!(found, unique = links.len(), "Discovered article links");
    Ok(links)
}

/// Scrape `links` one after another, stopping at the first failure.
///
/// # Arguments
///
/// * `fetcher` - Source of the article pages
/// * `links` - Article URLs, fetched in this order
///
/// # Returns
///
/// One [`Article`] per link, in the same order.
#[instrument(level = "info", skip_all, fields(count = links.len()))]
pub async fn scrape_links<F: Fetch>(fetcher: &F, links: Vec<String>) -> Result<Vec<Article>, FetchError> {
    let total = links.len();
    stream::iter(links.into_iter().enumerate())
        .then(|(i, link)| async move {
            debug!(index = i + 1, total, %link, "Scraping article");
            fetch_article(fetcher, &link).await
        })
        .try_collect()
        .await
}

/// Crawl `range`, scrape every discovered article and overwrite the store at
/// `path` with the result, which is also returned.
///
/// # Arguments
///
/// * `fetcher` - Source of index and article pages
/// * `config` - Supplies the index base URL
/// * `range` - Days to crawl, start to end inclusive
/// * `path` - Store file to overwrite
///
/// # Returns
///
/// The articles written, in discovery order.
///
/// # Errors
///
/// Any fetch failure aborts the run before the store is touched. Write
/// failures surface as [`CrawlError::Io`].
#[instrument(level = "info", skip(fetcher, config, path), fields(path = %path.display()))]
pub async fn backfill<F: Fetch>(
    fetcher: &F,
    config: &CrawlerConfig,
    range: DateRange,
    path: &Path,
) -> Result<Vec<Article>, CrawlError> {
    let links = discover_links(fetcher, config, range).await?;
    let articles = scrape_links(fetcher, links).await?;
    write_articles(path, &articles).await?;
    info!(count = articles.len(), "Backfill complete");
    Ok(articles)
}
