//! Publication timestamp normalization.
//!
//! Article pages render their date in one of several templates, e.g.
//!
//! ```text
//! Senin, 06 Oktober 2025 | 14:30
//! Senin, 06 Oktober 2025 | 14:30 WIB
//! Senin, 06 Oktober 2025 - 14:30
//! ```
//!
//! [`normalize`] tries each known format in order and returns the first match
//! as `YYYY-MM-DDTHH:MM:SS`. Unrecognised text is returned unchanged with a
//! warning; an odd date never fails the article.
//!
//! The leading day name has to be a weekday but is not checked against the
//! date, so `Minggu, 06 Oktober 2025 | 14:30` still reads as 6 October.

use chrono::{NaiveDateTime, Weekday};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::{debug, warn};

/// Known page date formats, tried in order.
pub const TIMESTAMP_FORMATS: &[&str] = &[
    "%A, %d %B %Y | %H:%M",
    "%A, %d %B %Y | %H:%M WIB",
    "%A, %d %B %Y - %H:%M",
];

const CANONICAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Format prefix for the day name; parsed separately and then ignored.
const WEEKDAY_PREFIX: &str = "%A, ";

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static LOCAL_NAMES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(senin|selasa|rabu|kamis|jumat|jum'at|sabtu|minggu|januari|februari|maret|april|mei|juni|juli|agustus|september|oktober|november|desember)\b",
    )
    .unwrap()
});

static LEADING_WEEKDAY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\p{L}+), (.*)$").unwrap());

/// English equivalent of an Indonesian day or month name (lowercase input).
fn english_name(local: &str) -> Option<&'static str> {
    let english = match local {
        "senin" => "Monday",
        "selasa" => "Tuesday",
        "rabu" => "Wednesday",
        "kamis" => "Thursday",
        "jumat" | "jum'at" => "Friday",
        "sabtu" => "Saturday",
        "minggu" => "Sunday",
        "januari" => "January",
        "februari" => "February",
        "maret" => "March",
        "april" => "April",
        "mei" => "May",
        "juni" => "June",
        "juli" => "July",
        "agustus" => "August",
        "september" => "September",
        "oktober" => "October",
        "november" => "November",
        "desember" => "December",
        _ => return None,
    };
    Some(english)
}

/// Collapse whitespace and rewrite Indonesian day/month names so chrono's
/// English `%A`/`%B` can read them.
fn prepare(raw: &str) -> String {
    let collapsed = WHITESPACE.replace_all(raw.trim(), " ");
    LOCAL_NAMES
        .replace_all(&collapsed, |caps: &Captures| {
            english_name(&caps[1].to_lowercase()).map_or_else(|| caps[0].to_string(), str::to_string)
        })
        .into_owned()
}

/// The text after a leading `Weekday, `, if the first word names a weekday.
fn strip_weekday(prepared: &str) -> Option<&str> {
    let caps = LEADING_WEEKDAY.captures(prepared)?;
    caps[1].parse::<Weekday>().ok()?;
    caps.get(2).map(|rest| rest.as_str())
}

/// Parse `raw` against `formats`, returning the first successful reading.
///
/// Formats starting with `%A, ` need a weekday name in that position, but
/// the name may disagree with the date.
pub fn parse_with(raw: &str, formats: &[&str]) -> Option<NaiveDateTime> {
    let prepared = prepare(raw);
    let dated = strip_weekday(&prepared);
    formats.iter().find_map(|fmt| match fmt.strip_prefix(WEEKDAY_PREFIX) {
        Some(date_fmt) => NaiveDateTime::parse_from_str(dated?, date_fmt).ok(),
        None => NaiveDateTime::parse_from_str(&prepared, fmt).ok(),
    })
}

/// Normalize against an explicit format list; see [`normalize`].
pub fn normalize_with(raw: &str, formats: &[&str]) -> String {
    match parse_with(raw, formats) {
        Some(dt) => {
            let canonical = dt.format(CANONICAL_FORMAT).to_string();
            debug!(%raw, %canonical, "Normalized timestamp");
            canonical
        }
        None => {
            warn!(%raw, "Unrecognised date format; keeping raw text");
            raw.to_string()
        }
    }
}

/// Convert a page date string to ISO-8601, or return it unchanged.
///
/// # Arguments
///
/// * `raw` - Date text as shown on the article page, in Indonesian or English
///
/// # Returns
///
/// `YYYY-MM-DDTHH:MM:SS` for the first of [`TIMESTAMP_FORMATS`] that matches,
/// otherwise `raw` as given.
pub fn normalize(raw: &str) -> String {
    normalize_with(raw, TIMESTAMP_FORMATS)
}
