//! Incremental polling of the live index.
//!
//! Each call to [`poll_once`] loads the store, fetches the index for the
//! current minute, scrapes only links the store has not seen, appends them
//! and rewrites the store. Polling an unchanged index adds nothing.

use super::index_url;
use crate::config::CrawlerConfig;
use crate::error::CrawlError;
use crate::fetch::Fetch;
use crate::outputs::json::{load_articles, write_articles};
use crate::scrapers::bisnis::{fetch_article, index_articles};
use chrono::{Local, NaiveDateTime};
use std::collections::HashSet;
use std::path::Path;
use tokio::time::sleep;
use tracing::{info, instrument};

/// Index URL for a poll at `now`, at minute precision.
///
/// The live endpoint has not been confirmed to treat this as "up to this
/// minute" rather than "at this minute"; the literal value is sent as is.
pub fn poll_index_url(base: &str, now: NaiveDateTime) -> String {
    index_url(base, &now.format("%Y-%m-%d %H:%M").to_string())
}

/// Merge articles listed on the index at `now` into the store at `path`.
///
/// # Arguments
///
/// * `fetcher` - Source of index and article pages
/// * `config` - Supplies the index base URL and the pause after each new article
/// * `path` - Store file to merge into; missing or malformed reads as empty
/// * `now` - Poll time, sent to the index at minute precision
///
/// # Returns
///
/// How many articles were added. The store is rewritten even when that is zero.
///
/// # Errors
///
/// A fetch failure ends the poll before the store is rewritten.
#[instrument(level = "info", skip(fetcher, config, path), fields(path = %path.display()))]
pub async fn poll_once<F: Fetch>(
    fetcher: &F,
    config: &CrawlerConfig,
    path: &Path,
    now: NaiveDateTime,
) -> Result<usize, CrawlError> {
    let mut articles = load_articles(path).await;
    let mut seen: HashSet<String> = articles
        .iter()
        .filter(|a| !a.link.is_empty())
        .map(|a| a.link.clone())
        .collect();

    let url = poll_index_url(&config.index_url, now);
    let links = index_articles(fetcher, &url).await?;

    let mut added = 0;
    for link in links {
        if seen.contains(&link) {
            continue;
        }
        info!(%link, "New article");
        let article = fetch_article(fetcher, &link).await?;
        sleep(config.politeness_delay()).await;
        articles.push(article);
        seen.insert(link);
        added += 1;
    }

    if added == 0 {
        info!("No new articles");
    }

    write_articles(path, &articles).await?;
    info!(added, total = articles.len(), "Poll complete");
    Ok(added)
}

/// [`poll_once`] at the current local time.
pub async fn poll_now<F: Fetch>(fetcher: &F, config: &CrawlerConfig, path: &Path) -> Result<usize, CrawlError> {
    poll_once(fetcher, config, path, Local::now().naive_local()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::fixtures::{article_page, config, index_page, BASE};
    use crate::error::FetchError;
    use crate::fetch::testing::StaticFetcher;
    use crate::models::Article;
    use chrono::NaiveDate;
    use std::time::Duration;

    const A: &str = "https://www.bisnis.com/read/a";
    const B: &str = "https://www.bisnis.com/read/b";
    const C: &str = "https://www.bisnis.com/read/c";

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 10, 6)
            .unwrap()
            .and_hms_opt(14, 30, 42)
            .unwrap()
    }

    fn fetcher_listing(links: &[&str]) -> StaticFetcher {
        let mut fetcher = StaticFetcher::new().with_page(&poll_index_url(BASE, now()), &index_page(links));
        for link in [A, B, C] {
            fetcher = fetcher.with_page(link, &article_page(link));
        }
        fetcher
    }

    fn stored_links(articles: &[Article]) -> Vec<&str> {
        articles.iter().map(|a| a.link.as_str()).collect()
    }

    #[test]
    fn test_poll_index_url_has_minute_precision() {
        assert_eq!(
            poll_index_url(BASE, now()),
            "https://www.bisnis.com/index?date=2025-10-06%2014%3A30"
        );
    }

    #[tokio::test]
    async fn test_poll_merges_only_new_links() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new_article.json");
        write_articles(&path, &[Article::with_link(A)]).await.unwrap();

        let fetcher = fetcher_listing(&[A, B]);
        let added = poll_once(&fetcher, &config(), &path, now()).await.unwrap();

        assert_eq!(added, 1);
        assert_eq!(fetcher.request_count(A), 0);
        let stored = load_articles(&path).await;
        assert_eq!(stored_links(&stored), vec![A, B]);
        assert_eq!(stored[0], Article::with_link(A));
    }

    #[tokio::test]
    async fn test_repoll_of_unchanged_index_adds_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new_article.json");
        let fetcher = fetcher_listing(&[A, B]);

        assert_eq!(poll_once(&fetcher, &config(), &path, now()).await.unwrap(), 2);
        let first = std::fs::read_to_string(&path).unwrap();

        assert_eq!(poll_once(&fetcher, &config(), &path, now()).await.unwrap(), 0);
        let second = std::fs::read_to_string(&path).unwrap();

        assert_eq!(first, second);
        assert_eq!(fetcher.request_count(A), 1);
        assert_eq!(fetcher.request_count(B), 1);
    }

    #[tokio::test]
    async fn test_repeated_link_in_one_page_is_scraped_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new_article.json");
        let fetcher = fetcher_listing(&[B, C, B]);

        assert_eq!(poll_once(&fetcher, &config(), &path, now()).await.unwrap(), 2);
        assert_eq!(fetcher.request_count(B), 1);
        assert_eq!(stored_links(&load_articles(&path).await), vec![B, C]);
    }

    #[tokio::test]
    async fn test_missing_store_behaves_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data/new_article.json");
        let fetcher = fetcher_listing(&[C]);

        assert_eq!(poll_once(&fetcher, &config(), &path, now()).await.unwrap(), 1);
        assert_eq!(stored_links(&load_articles(&path).await), vec![C]);
    }

    #[tokio::test]
    async fn test_corrupt_store_behaves_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new_article.json");
        std::fs::write(&path, "{not json").unwrap();
        let fetcher = fetcher_listing(&[A, B]);

        assert_eq!(poll_once(&fetcher, &config(), &path, now()).await.unwrap(), 2);
        assert_eq!(stored_links(&load_articles(&path).await), vec![A, B]);
    }

    #[tokio::test]
    async fn test_empty_index_still_rewrites_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new_article.json");
        let fetcher = fetcher_listing(&[]);

        assert_eq!(poll_once(&fetcher, &config(), &path, now()).await.unwrap(), 0);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_article_failure_leaves_store_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new_article.json");
        write_articles(&path, &[Article::with_link(A)]).await.unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        let gone = "https://www.bisnis.com/read/gone";
        let fetcher = fetcher_listing(&[B, gone]);
        let result = poll_once(&fetcher, &config(), &path, now()).await;

        assert!(matches!(result, Err(CrawlError::Fetch(FetchError::Status { status: 404, .. }))));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_pauses_after_each_new_article() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new_article.json");
        write_articles(&path, &[Article::with_link(A)]).await.unwrap();
        let config = CrawlerConfig {
            politeness_delay_ms: 250,
            ..config()
        };
        let fetcher = fetcher_listing(&[A, B, C]);

        let t0 = tokio::time::Instant::now();
        assert_eq!(poll_once(&fetcher, &config, &path, now()).await.unwrap(), 2);
        let elapsed = t0.elapsed();

        // Two new articles, two pauses; the already stored one costs nothing.
        assert!(elapsed >= Duration::from_millis(500), "paused only {elapsed:?}");
        assert!(elapsed < Duration::from_millis(750), "paused {elapsed:?}");
    }

    #[tokio::test]
    async fn test_records_without_link_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new_article.json");
        std::fs::write(&path, r#"[{"Judul": "Tanpa tautan", "Isi": "x"}]"#).unwrap();
        let fetcher = fetcher_listing(&[A]);

        assert_eq!(poll_once(&fetcher, &config(), &path, now()).await.unwrap(), 1);
        let stored = load_articles(&path).await;
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].title.as_deref(), Some("Tanpa tautan"));
        assert_eq!(stored[1].link, A);
    }
}
