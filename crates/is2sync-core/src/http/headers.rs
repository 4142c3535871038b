//! Parse HTTP response header lines of the final response in a redirect chain.

use chrono::{DateTime, Utc};

/// Headers of the last response curl saw (after redirects).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    /// Total size in bytes, if `Content-Length` is present.
    pub content_length: Option<u64>,
    /// `Last-Modified`, when present and a valid HTTP date.
    pub last_modified: Option<DateTime<Utc>>,
}

/// Parse collected header lines. Every status line (`HTTP/...`) starts a new
/// response, so only the headers of the final response are kept.
pub(crate) fn parse_headers(lines: &[String]) -> ResponseHeaders {
    let mut out = ResponseHeaders::default();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            out = ResponseHeaders::default();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                out.content_length = value.parse::<u64>().ok();
            } else if name.eq_ignore_ascii_case("last-modified") {
                out.last_modified = DateTime::parse_from_rfc2822(value)
                    .ok()
                    .map(|t| t.with_timezone(&Utc));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_headers_content_length_and_last_modified() {
        let r = parse_headers(&lines(&[
            "HTTP/1.1 200 OK",
            "Content-Length: 12345",
            "Content-Type: application/x-hdf5",
            "Last-Modified: Wed, 21 Oct 2015 07:28:00 GMT",
        ]));
        assert_eq!(r.content_length, Some(12345));
        assert_eq!(
            r.last_modified.map(|t| t.to_rfc3339()).as_deref(),
            Some("2015-10-21T07:28:00+00:00")
        );
    }

    #[test]
    fn keeps_only_final_response_of_redirect_chain() {
        let r = parse_headers(&lines(&[
            "HTTP/1.1 302 Found",
            "Location: https://urs.earthdata.nasa.gov/oauth/authorize",
            "Content-Length: 0",
            "",
            "HTTP/1.1 302 Found",
            "Location: https://n5eil01u.ecs.nsidc.org/ATLAS/x.h5",
            "",
            "HTTP/1.1 200 OK",
            "content-length: 999",
        ]));
        assert_eq!(r.content_length, Some(999));
        assert_eq!(r.last_modified, None);
    }

    #[test]
    fn malformed_length_is_ignored() {
        let r = parse_headers(&lines(&[
            "HTTP/1.1 200 OK",
            "Content-Length: lots",
            "Last-Modified: yesterday",
        ]));
        assert_eq!(r.content_length, None);
        assert_eq!(r.last_modified, None);
    }
}
