//! Site scrapers.
//!
//! Each scraper follows the same two-phase pattern:
//!
//! 1. **Indexing**: `index_articles(fetcher, url)` returns the article URLs on an index page
//! 2. **Fetching**: `fetch_article(fetcher, url)` downloads one article and extracts an [`Article`](crate::models::Article)
//!
//! | Source | Module | Method |
//! |--------|--------|--------|
//! | Bisnis.com | [`bisnis`] | HTML scraping of the dated index and article templates |

pub mod bisnis;
