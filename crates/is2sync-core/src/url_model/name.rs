//! Local file names derived from index hrefs.

/// Linux NAME_MAX.
const NAME_MAX: usize = 255;

/// Local file name for an index href: the last path segment, percent-decoded.
///
/// Returns `None` for directory links, parent links, query-only links and
/// names that are unsafe to create on Linux (separators, NUL/control chars,
/// `.`/`..`, or longer than NAME_MAX). Such entries are never downloaded.
pub fn local_name_from_href(href: &str) -> Option<String> {
    let path = href.split(['?', '#']).next()?;
    if path.ends_with('/') {
        return None;
    }
    let segment = path.rsplit('/').next()?;
    let decoded = percent_decode(segment)?;
    if decoded.is_empty()
        || decoded == "."
        || decoded == ".."
        || decoded.len() > NAME_MAX
        || decoded
            .chars()
            .any(|c| c == '/' || c == '\\' || c == '\0' || c.is_control())
    {
        return None;
    }
    Some(decoded)
}

fn percent_decode(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = s.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_and_nested_hrefs() {
        assert_eq!(
            local_name_from_href("ATL03_20181014000347_02350101_003_01.h5").as_deref(),
            Some("ATL03_20181014000347_02350101_003_01.h5")
        );
        assert_eq!(
            local_name_from_href("/ATLAS/ATL03.003/2018.10.14/a.iso.xml").as_deref(),
            Some("a.iso.xml")
        );
        assert_eq!(
            local_name_from_href("https://h/x/file.h5?x=1#frag").as_deref(),
            Some("file.h5")
        );
    }

    #[test]
    fn percent_encoded_names() {
        assert_eq!(local_name_from_href("a%20b.h5").as_deref(), Some("a b.h5"));
        assert_eq!(local_name_from_href("bad%2"), None);
        assert_eq!(local_name_from_href("a%2Fb.h5"), None);
    }

    #[test]
    fn directories_and_unsafe_names_rejected() {
        assert_eq!(local_name_from_href("/ATLAS/ATL03.003/"), None);
        assert_eq!(local_name_from_href(".."), None);
        assert_eq!(local_name_from_href("?C=M;O=A"), None);
        assert_eq!(local_name_from_href("x%00y"), None);
        assert_eq!(local_name_from_href(&"a".repeat(300)), None);
    }
}
