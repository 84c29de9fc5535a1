//! Error types for the crawl pipeline.
//!
//! Only [`FetchError`] aborts an operation in progress. Parsing irregularities
//! (unknown date formats, missing page regions, an unreadable store file) are
//! logged and degrade to empty values instead of surfacing here.

use thiserror::Error;

/// A failed HTTP fetch: non-2xx status, timeout, or transport failure.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("GET {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("GET {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid header value for {name}")]
    Header { name: &'static str },
}

/// Anything that can end a backfill run or a poll tick.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("store I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode store: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl CrawlError {
    pub(crate) fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        CrawlError::Io {
            path: path.into(),
            source,
        }
    }
}
