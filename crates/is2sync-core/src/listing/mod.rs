//! Remote index listing: fetch a directory page and keep the entries the
//! association rule accepts.

mod parse;

pub use parse::{parse_index, parse_last_modified, IndexRow, LASTMOD_FORMAT};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use url::Url;

use crate::granule::AssociationRule;
use crate::http::HttpFetch;
use crate::url_model::{join_href, local_name_from_href};

/// A file offered by the remote index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    /// File name as listed (also the local file name).
    pub name: String,
    pub url: Url,
    pub last_modified: Option<DateTime<Utc>>,
}

/// Turn index rows into remote entries, dropping directories and unsafe names.
pub fn entries_from_rows(directory: &Url, rows: Vec<IndexRow>) -> Result<Vec<RemoteEntry>> {
    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        let Some(name) = local_name_from_href(&row.href) else {
            continue;
        };
        let url = join_href(directory, &row.href)?;
        entries.push(RemoteEntry {
            name,
            url,
            last_modified: row.last_modified,
        });
    }
    Ok(entries)
}

/// GET `directory` and return the entries matching `rule`, in listing order.
/// An empty result is not an error.
pub fn list_matching(
    client: &mut dyn HttpFetch,
    directory: &Url,
    rule: &AssociationRule,
) -> Result<Vec<RemoteEntry>> {
    let html = client
        .get_text(directory.as_str())
        .with_context(|| format!("list {}", directory))?;
    let rows = parse_index(&html);
    let total = rows.len();
    let matching: Vec<RemoteEntry> = entries_from_rows(directory, rows)?
        .into_iter()
        .filter(|e| rule.matches(&e.name))
        .collect();
    tracing::debug!(
        directory = %directory,
        pattern = rule.pattern(),
        rows = total,
        matched = matching.len(),
        "listed remote directory"
    );
    Ok(matching)
}
