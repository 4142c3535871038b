//! ICESat-2 ATLAS product catalog.

use std::fmt;
use std::str::FromStr;

/// Products that can be requested as an association target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Product {
    Atl03,
    Atl04,
    Atl06,
    Atl07,
    Atl08,
    Atl09,
    Atl10,
    Atl12,
    Atl13,
}

impl Product {
    pub const ALL: [Product; 9] = [
        Product::Atl03,
        Product::Atl04,
        Product::Atl06,
        Product::Atl07,
        Product::Atl08,
        Product::Atl09,
        Product::Atl10,
        Product::Atl12,
        Product::Atl13,
    ];

    /// Short code used in file names and NSIDC directories (`ATL03`).
    pub fn code(self) -> &'static str {
        match self {
            Product::Atl03 => "ATL03",
            Product::Atl04 => "ATL04",
            Product::Atl06 => "ATL06",
            Product::Atl07 => "ATL07",
            Product::Atl08 => "ATL08",
            Product::Atl09 => "ATL09",
            Product::Atl10 => "ATL10",
            Product::Atl12 => "ATL12",
            Product::Atl13 => "ATL13",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Product::Atl03 => "Global Geolocated Photon Data",
            Product::Atl04 => "Normalized Relative Backscatter",
            Product::Atl06 => "Land Ice Height",
            Product::Atl07 => "Sea Ice Height",
            Product::Atl08 => "Land and Vegetation Height",
            Product::Atl09 => "Atmospheric Layer Characteristics",
            Product::Atl10 => "Sea Ice Freeboard",
            Product::Atl12 => "Ocean Surface Height",
            Product::Atl13 => "Inland Water Surface Height",
        }
    }

    /// Comma-separated list of every valid code, sorted.
    pub fn valid_codes() -> String {
        let mut codes: Vec<&str> = Product::ALL.iter().map(|p| p.code()).collect();
        codes.sort_unstable();
        codes.join(",")
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("incorrect data product entered: {given:?} (valid: {valid})")]
pub struct UnknownProduct {
    pub given: String,
    pub valid: String,
}

impl FromStr for Product {
    type Err = UnknownProduct;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Product::ALL
            .iter()
            .copied()
            .find(|p| p.code().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownProduct {
                given: s.to_string(),
                valid: Product::valid_codes(),
            })
    }
}
