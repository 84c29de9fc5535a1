//! Bisnis.com index and article scraper.
//!
//! The index page lists one `artItem` card per article; article pages come
//! in several templates which differ mostly in where the publication date is
//! rendered. Every field on an article page is optional: a missing region
//! yields `None`/empty rather than an error. Only fetch failures propagate.
//!
//! Index cards are matched on their exact `class` attribute, so a card whose
//! class list carries extra tokens (promoted or sponsored slots) is skipped.

use crate::error::{CrawlError, FetchError};
use crate::fetch::Fetch;
use crate::models::Article;
use crate::timestamp::{normalize_with, TIMESTAMP_FORMATS};
use crate::utils::truncate_for_log;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument, warn};
use url::Url;

static ARTICLE_LINK: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"div[class="artItem"] div[class="artContent"] > a[class="artLink"][href]"#).unwrap()
});

static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse(r#"div[class*="detailsTitle"] > h1"#).unwrap());

static BODY_PARAGRAPH: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"article[class*="detailsContent"] p"#).unwrap());

/// Which text nodes of a matched element count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextScope {
    /// Direct text children only.
    Own,
    /// Every descendant text node.
    Descendants,
}

/// Which of the collected text nodes is the date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pick {
    First,
    Last,
}

/// One place an article template renders its publication date.
#[derive(Debug)]
struct DateSource {
    selector: &'static str,
    scope: TextScope,
    pick: Pick,
    formats: &'static [&'static str],
}

/// Date locations, tried in order. The first one that yields any text wins.
const DATE_SOURCES: &[DateSource] = &[
    DateSource {
        selector: r#"div[class="detailsAttributeDates"]"#,
        scope: TextScope::Own,
        pick: Pick::First,
        formats: TIMESTAMP_FORMATS,
    },
    DateSource {
        selector: r#"span[class="detailsAttributeItem"]"#,
        scope: TextScope::Descendants,
        pick: Pick::Last,
        formats: TIMESTAMP_FORMATS,
    },
    DateSource {
        selector: r#"p[class*="authorTime"]"#,
        scope: TextScope::Own,
        pick: Pick::Last,
        formats: TIMESTAMP_FORMATS,
    },
    DateSource {
        selector: r#"div[class*="detailsAttribute"] > span:nth-of-type(2)"#,
        scope: TextScope::Descendants,
        pick: Pick::Last,
        formats: TIMESTAMP_FORMATS,
    },
];

static DATE_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    DATE_SOURCES
        .iter()
        .map(|source| Selector::parse(source.selector).unwrap())
        .collect()
});

fn text_nodes<'a>(element: ElementRef<'a>, scope: TextScope) -> Vec<&'a str> {
    match scope {
        TextScope::Own => element
            .children()
            .filter_map(|node| node.value().as_text())
            .map(|text| &**text)
            .collect(),
        TextScope::Descendants => element.text().collect(),
    }
}

/// Extract article hrefs from index markup, in document order.
///
/// Relative hrefs are resolved against `base`.
pub fn parse_index(markup: &str, base: &Url) -> Vec<String> {
    let document = Html::parse_document(markup);
    let mut links = Vec::new();
    for element in document.select(&ARTICLE_LINK) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        match base.join(href.trim()) {
            Ok(resolved) => links.push(resolved.to_string()),
            Err(e) => warn!(%href, error = %e, "Skipping unresolvable article link"),
        }
    }
    links
}

/// Fetch an index page and return the article URLs it lists.
///
/// # Arguments
///
/// * `fetcher` - Source of the index markup
/// * `index_url` - Absolute index URL including its `date` query
///
/// # Returns
///
/// Absolute article URLs in page order, repeats included. An index with no
/// article cards is a valid empty result.
///
/// # Errors
///
/// [`CrawlError::InvalidUrl`] when `index_url` does not parse, or the fetch
/// failure as [`CrawlError::Fetch`].
#[instrument(level = "info", skip(fetcher))]
pub async fn index_articles<F: Fetch>(fetcher: &F, index_url: &str) -> Result<Vec<String>, CrawlError> {
    let base = Url::parse(index_url).map_err(|source| CrawlError::InvalidUrl {
        url: index_url.to_string(),
        source,
    })?;
    let markup = fetcher.fetch(index_url).await?;
    let links = parse_index(&markup, &base);

    info!(count = links.len(), "Indexed article URLs");
    debug!(urls = ?links, "Index URLs");
    Ok(links)
}

fn extract_title(document: &Html) -> Option<String> {
    document
        .select(&TITLE)
        .flat_map(|h1| h1.text())
        .next()
        .map(|text| text.trim().to_string())
}

/// Raw date text from the first template location that has any.
fn extract_date_text(document: &Html) -> Option<(&'static DateSource, String)> {
    for (source, selector) in DATE_SOURCES.iter().zip(DATE_SELECTORS.iter()) {
        let texts: Vec<&str> = document
            .select(selector)
            .flat_map(|element| text_nodes(element, source.scope))
            .collect();
        let picked = match source.pick {
            Pick::First => texts.first(),
            Pick::Last => texts.last(),
        };
        if let Some(text) = picked {
            debug!(selector = source.selector, "Date location matched");
            return Some((source, text.trim().to_string()));
        }
    }
    None
}

fn extract_timestamp(document: &Html, url: &str) -> Option<String> {
    let (source, raw) = extract_date_text(document)?;
    if raw.is_empty() {
        warn!(%url, selector = source.selector, "Date element is empty");
        return None;
    }
    Some(normalize_with(&raw, source.formats))
}

fn extract_body(document: &Html) -> String {
    document
        .select(&BODY_PARAGRAPH)
        .flat_map(|p| p.text())
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build an [`Article`] from article markup. Never fails; absent regions
/// become `None` or an empty body.
pub fn parse_article(markup: &str, url: &str) -> Article {
    let document = Html::parse_document(markup);
    let title = extract_title(&document);
    let timestamp = extract_timestamp(&document, url);
    let body = extract_body(&document);

    if title.is_none() {
        warn!(%url, "No title found");
    }
    if timestamp.is_none() {
        warn!(%url, "No publication date found");
    }

    Article {
        link: url.to_string(),
        title,
        timestamp,
        body,
    }
}

/// Fetch and parse a single article page.
///
/// # Arguments
///
/// * `fetcher` - Source of the article markup
/// * `url` - Article URL, stored verbatim as the record's link
///
/// # Returns
///
/// The parsed [`Article`]. Missing page regions never fail the call; only
/// the fetch itself can.
#[instrument(level = "info", skip(fetcher))]
pub async fn fetch_article<F: Fetch>(fetcher: &F, url: &str) -> Result<Article, FetchError> {
    let markup = fetcher.fetch(url).await?;
    let article = parse_article(&markup, url);
    info!(
        title = %truncate_for_log(article.title.as_deref().unwrap_or_default(), 80),
        timestamp = article.timestamp.as_deref().unwrap_or_default(),
        bytes = article.body.len(),
        "Parsed article"
    );
    Ok(article)
}
