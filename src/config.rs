//! Crawler configuration.
//!
//! The header set, timeout and politeness delay are carried as a value and
//! handed to the fetcher and crawlers explicitly. Values come from the
//! built-in defaults, optionally overlaid by a YAML file and then by CLI flags.

use serde::Deserialize;
use std::error::Error;
use std::time::Duration;
use tokio::fs;
use tracing::{info, instrument};

/// Listing page that enumerates articles for a given `date` query parameter.
pub const DEFAULT_INDEX_URL: &str = "https://www.bisnis.com/index";

/// Desktop browser identity; the index rejects obviously scripted clients.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

pub const DEFAULT_POLITENESS_DELAY_MS: u64 = 10;

/// Runtime settings shared by every fetch of a run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Base URL of the index page, without query string.
    pub index_url: String,
    /// `User-Agent` header attached to every request.
    pub user_agent: String,
    /// Per-request deadline in seconds.
    pub timeout_secs: u64,
    /// Pause after each article fetch in incremental mode.
    pub politeness_delay_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            index_url: DEFAULT_INDEX_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            politeness_delay_ms: DEFAULT_POLITENESS_DELAY_MS,
        }
    }
}

impl CrawlerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn politeness_delay(&self) -> Duration {
        Duration::from_millis(self.politeness_delay_ms)
    }

    /// Parse a YAML document; absent keys keep their defaults.
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    /// Load the YAML file at `path`.
    #[instrument(level = "info")]
    pub async fn load(path: &str) -> Result<Self, Box<dyn Error>> {
        let text = fs::read_to_string(path).await?;
        let config = Self::from_yaml(&text)?;
        info!(index_url = %config.index_url, timeout_secs = config.timeout_secs, "Loaded configuration");
        Ok(config)
    }
}
