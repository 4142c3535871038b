//! ICESat-2 granule file names.
//!
//! A granule name encodes the product, acquisition start time, reference
//! ground track, cycle, granule region, release and version, e.g.
//! `ATL06_20181014001049_02350102_003_01.h5`. Sea ice products carry a
//! hemisphere flag (`ATL07-01_...`) and subsetted files may carry a
//! `processed_` prefix.

mod association;

pub use association::AssociationRule;

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static GRANULE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?P<sub>processed_)?(?P<product>ATL\d{2})(?P<hem>-\d{2})?_(?P<year>\d{4})(?P<month>\d{2})(?P<day>\d{2})(?P<hour>\d{2})(?P<minute>\d{2})(?P<second>\d{2})_(?P<track>\d{4})(?P<cycle>\d{2})(?P<granule>\d{2})_(?P<release>\d{3})_(?P<version>\d{2})(?P<aux>.*?)\.h5$",
    )
    .expect("granule regex is valid")
});

/// Input name that does not follow the granule convention. The caller skips the file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GranuleError {
    #[error("no file name in path {0:?}")]
    NoFileName(String),
    #[error("{0:?} does not match the ICESat-2 granule naming convention")]
    NotAGranule(String),
}

/// Identifiers parsed from a granule file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GranuleName {
    pub processed: bool,
    pub product: String,
    /// Hemisphere flag without the dash (`01` north, `02` south), sea ice products only.
    pub hemisphere: Option<String>,
    pub year: String,
    pub month: String,
    pub day: String,
    pub hour: String,
    pub minute: String,
    pub second: String,
    pub track: String,
    pub cycle: String,
    pub granule: String,
    pub release: String,
    pub version: String,
    pub aux: String,
}

impl GranuleName {
    /// Parse the file name of `path` (directories are ignored).
    pub fn from_path(path: &Path) -> Result<Self, GranuleError> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| GranuleError::NoFileName(path.display().to_string()))?;
        Self::parse(name)
    }

    /// Parse a bare file name.
    pub fn parse(name: &str) -> Result<Self, GranuleError> {
        let caps = GRANULE_RE
            .captures(name)
            .ok_or_else(|| GranuleError::NotAGranule(name.to_string()))?;
        let field = |key: &str| {
            caps.name(key)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default()
        };
        Ok(GranuleName {
            processed: caps.name("sub").is_some(),
            product: field("product"),
            hemisphere: caps
                .name("hem")
                .map(|m| m.as_str().trim_start_matches('-').to_string()),
            year: field("year"),
            month: field("month"),
            day: field("day"),
            hour: field("hour"),
            minute: field("minute"),
            second: field("second"),
            track: field("track"),
            cycle: field("cycle"),
            granule: field("granule"),
            release: field("release"),
            version: field("version"),
            aux: field("aux"),
        })
    }

    /// NSIDC date directory for this granule (`2018.10.14`).
    pub fn date_directory(&self) -> String {
        format!("{}.{}.{}", self.year, self.month, self.day)
    }
}
