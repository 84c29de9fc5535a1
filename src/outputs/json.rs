//! JSON article store.
//!
//! A store is one file holding a pretty-printed JSON array of [`Article`]
//! records, UTF-8 with non-ASCII text written literally. It is always read
//! whole and rewritten whole.
//!
//! # Tolerant loading
//!
//! A missing, unreadable or malformed file loads as an empty store. The next
//! save then replaces it with whatever the run collected. Inside a valid
//! array each record is decoded on its own; a record that does not fit
//! [`Article`] is skipped with a warning and the rest are kept.

use crate::error::CrawlError;
use crate::models::Article;
use crate::utils::{ensure_parent_dir, truncate_for_log};
use serde::Deserialize;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, instrument, warn};

/// Load every record from the store at `path`; never fails.
///
/// # Arguments
///
/// * `path` - Store file to read
///
/// # Returns
///
/// The decodable records in file order. A missing, unreadable or non-array
/// file gives an empty vector.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn load_articles(path: &Path) -> Vec<Article> {
    let text = match fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("Store does not exist yet; starting empty");
            return Vec::new();
        }
        Err(e) => {
            warn!(error = %e, "Store is unreadable; treating as empty");
            return Vec::new();
        }
    };

    let records = match serde_json::from_str::<Vec<Value>>(&text) {
        Ok(records) => records,
        Err(e) => {
            warn!(error = %e, "Store is not a valid JSON array; treating as empty");
            return Vec::new();
        }
    };

    let total = records.len();
    let articles: Vec<Article> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match Article::deserialize(&record) {
            Ok(article) => Some(article),
            Err(e) => {
                let shown = truncate_for_log(&record.to_string(), 120);
                warn!(index, record = %shown, error = %e, "Skipping undecodable store record");
                None
            }
        })
        .collect();

    debug!(count = articles.len(), skipped = total - articles.len(), "Loaded store");
    articles
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Replace the store at `path` with `articles`.
///
/// The JSON is written to a sibling `.tmp` file first and renamed into place.
///
/// # Arguments
///
/// * `path` - Store file to replace; missing parent directories are created
/// * `articles` - Full store contents, in the order they should be written
///
/// # Errors
///
/// [`CrawlError::Encode`] if serialization fails, [`CrawlError::Io`] naming
/// the file that could not be created, written or renamed.
#[instrument(level = "info", skip_all, fields(path = %path.display(), count = articles.len()))]
pub async fn write_articles(path: &Path, articles: &[Article]) -> Result<(), CrawlError> {
    let json = serde_json::to_string_pretty(articles)?;
    let display = path.display().to_string();

    ensure_parent_dir(path)
        .await
        .map_err(|e| CrawlError::io(&display, e))?;

    let tmp = temp_path(path);
    fs::write(&tmp, json)
        .await
        .map_err(|e| CrawlError::io(tmp.display().to_string(), e))?;
    fs::rename(&tmp, path)
        .await
        .map_err(|e| CrawlError::io(&display, e))?;

    info!("Wrote article store");
    Ok(())
}
