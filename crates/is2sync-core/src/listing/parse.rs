//! Scrape Apache `mod_autoindex` table listings.
//!
//! Rows look like:
//! `<tr><td class="indexcolicon">..</td><td class="indexcolname"><a href="NAME">NAME</a></td>
//! <td class="indexcollastmod">2018-10-20 03:14  </td><td class="indexcolsize">1.2G</td></tr>`

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static ROW_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<tr[^>]*>(.*?)</tr>").expect("row regex is valid"));

static NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<td[^>]*class\s*=\s*"indexcolname"[^>]*>.*?<a[^>]*href\s*=\s*"([^"]*)""#)
        .expect("name regex is valid")
});

static LASTMOD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<td[^>]*class\s*=\s*"indexcollastmod"[^>]*>([^<]*)</td>"#)
        .expect("lastmod regex is valid")
});

/// Last-modified column format (UTC).
pub const LASTMOD_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One row of the index: href plus parsed last-modified time, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRow {
    pub href: String,
    pub last_modified: Option<DateTime<Utc>>,
}

/// Extract every named row from an index page, in page order.
pub fn parse_index(html: &str) -> Vec<IndexRow> {
    ROW_RE
        .captures_iter(html)
        .filter_map(|row| {
            let cells = row.get(1)?.as_str();
            let href = NAME_RE.captures(cells)?.get(1)?.as_str();
            let last_modified = LASTMOD_RE
                .captures(cells)
                .and_then(|c| c.get(1))
                .and_then(|m| parse_last_modified(m.as_str()));
            Some(IndexRow {
                href: unescape_html(href),
                last_modified,
            })
        })
        .collect()
}

/// Parse `2018-10-20 03:14` (trailing whitespace and `&nbsp;` tolerated).
pub fn parse_last_modified(text: &str) -> Option<DateTime<Utc>> {
    let text = text.replace("&nbsp;", " ");
    let naive = NaiveDateTime::parse_from_str(text.trim(), LASTMOD_FORMAT).ok()?;
    Some(Utc.from_utc_datetime(&naive))
}

fn unescape_html(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
}
