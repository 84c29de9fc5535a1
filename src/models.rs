//! Data model for scraped articles.
//!
//! An [`Article`] is the unit persisted in the JSON store. Field names are
//! part of the store format and must not change; the Indonesian keys written
//! by earlier versions of the store (`Link`, `Judul`, `Tanggal`, `Isi`) are
//! accepted when reading. A `null` link or body reads as an empty string.

use serde::{Deserialize, Deserializer, Serialize};

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single scraped article.
///
/// `link` is the unique key within a store. `title` and `timestamp` are
/// `None` (serialized as `null`) when the page had no matching element.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Article {
    /// Canonical article URL.
    #[serde(default, alias = "Link", deserialize_with = "null_as_empty")]
    pub link: String,
    /// Headline text, trimmed.
    #[serde(default, alias = "Judul")]
    pub title: Option<String>,
    /// ISO-8601 timestamp when the page date was recognised, otherwise the raw date text.
    #[serde(default, alias = "Tanggal")]
    pub timestamp: Option<String>,
    /// Paragraph text of the article body joined with single spaces.
    #[serde(default, alias = "Isi", deserialize_with = "null_as_empty")]
    pub body: String,
}

impl Article {
    /// A record with only its link set.
    pub fn with_link(link: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            title: None,
            timestamp: None,
            body: String::new(),
        }
    }
}
