//! Local file lifecycle for downloads.
//!
//! Bodies are streamed into `<final>.part`; once complete the temp file is
//! synced, stamped with the remote modification time and permission mode, and
//! renamed over the final path.

mod writer;

pub use writer::PartFile;

use std::path::{Path, PathBuf};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `a.h5` → `a.h5.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_path_appends_part() {
        let p = temp_path(Path::new("ATL03_x.h5"));
        assert_eq!(p.to_string_lossy(), "ATL03_x.h5.part");
        let p2 = temp_path(Path::new("/data/ATL03_x.iso.xml"));
        assert_eq!(p2.to_string_lossy(), "/data/ATL03_x.iso.xml.part");
    }
}
