//! URL modeling for the data pool tree and local file names.
//!
//! Remote directories are built from path segments under the data host and
//! always end with `/` so that index hrefs join relative to them.

mod name;

pub use name::local_name_from_href;

use anyhow::{Context, Result};
use url::Url;

/// `{host}/{segments...}/` with a trailing slash.
pub fn directory_url(host: &str, segments: &[String]) -> Result<Url> {
    let mut url = Url::parse(host).with_context(|| format!("invalid data host {:?}", host))?;
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| anyhow::anyhow!("data host cannot be a base URL: {}", host))?;
        path.pop_if_empty();
        for s in segments {
            path.push(s);
        }
        // Empty last segment yields the trailing slash.
        path.push("");
    }
    Ok(url)
}

/// Resolve an index href against its directory URL.
pub fn join_href(directory: &Url, href: &str) -> Result<Url> {
    directory
        .join(href)
        .with_context(|| format!("bad href {:?} in {}", href, directory))
}
