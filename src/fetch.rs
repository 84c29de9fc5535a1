//! Page fetching.
//!
//! - [`Fetch`]: the capability the scrapers depend on, "URL in, markup out"
//! - [`HttpFetcher`]: the `reqwest` implementation, built from a [`CrawlerConfig`]
//!
//! Failures are never retried here. A non-2xx status or a transport error
//! (including hitting the per-request deadline) comes back as a [`FetchError`]
//! and the caller decides how far it propagates.

use crate::config::CrawlerConfig;
use crate::error::FetchError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// Trait for retrieving the body of a page.
///
/// Returned futures are not required to be `Send`; crawls run on one task.
#[allow(async_fn_in_trait)]
pub trait Fetch {
    /// GET `url` and return the response body as text.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// HTTP fetcher carrying the identifying headers and timeout of one run.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a client for one run.
    ///
    /// # Arguments
    ///
    /// * `config` - Supplies the User-Agent and the per-request timeout
    ///
    /// # Returns
    ///
    /// A fetcher that sends the configured User-Agent and an
    /// Indonesian-first `Accept-Language` with every request.
    ///
    /// # Errors
    ///
    /// [`FetchError::Header`] when the User-Agent is not a valid header value,
    /// [`FetchError::Client`] when the TLS backend cannot be initialised.
    pub fn new(config: &CrawlerConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        let user_agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|_| FetchError::Header { name: "User-Agent" })?;
        headers.insert(USER_AGENT, user_agent);
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("id-ID,id;q=0.9,en;q=0.8"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let t0 = Instant::now();
        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Non-success status");
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(transport)?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(body)
    }
}
