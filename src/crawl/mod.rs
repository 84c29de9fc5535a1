//! Crawl strategies over the article index.
//!
//! - [`backfill`]: one-shot walk over an inclusive range of days, overwriting the store
//! - [`incremental`]: a single poll of the current index, merging new articles into the store
//!
//! Both share the same extraction ([`crate::scrapers::bisnis`]) and storage
//! ([`crate::outputs::json`]) steps. Fetches are strictly sequential.

pub mod backfill;
pub mod incremental;

/// Index page URL for a given `date` query value.
///
/// The value is percent-encoded; the service reads it as a plain date string.
pub fn index_url(base: &str, date: &str) -> String {
    format!("{}?date={}", base, urlencoding::encode(date))
}
