//! Bisnis.com article crawler.
//!
//! Two traversal strategies share one extraction and storage contract:
//!
//! - [`crawl::backfill`]: bounded walk over a range of days, overwriting the store
//! - [`crawl::incremental`]: unbounded polling that merges new articles into the store
//!
//! Page access goes through the [`fetch::Fetch`] trait so crawls can run
//! against canned pages in tests.

pub mod cli;
pub mod config;
pub mod crawl;
pub mod error;
pub mod fetch;
pub mod models;
pub mod outputs;
pub mod scheduler;
pub mod scrapers;
pub mod timestamp;
pub mod utils;

pub use error::{CrawlError, FetchError};
pub use models::Article;
