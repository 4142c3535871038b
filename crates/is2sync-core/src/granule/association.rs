//! Association rule: from a granule in one product to its counterpart in another.

use regex::Regex;

use super::GranuleName;
use crate::product::Product;

/// Name pattern and remote location of the granule associated with an input file.
#[derive(Debug, Clone)]
pub struct AssociationRule {
    pub product: Product,
    pub release: String,
    /// `YYYY.MM.DD` directory under `ATLAS/<PRODUCT>.<RELEASE>/`.
    pub date_directory: String,
    pattern: Regex,
}

impl AssociationRule {
    /// Build the rule for `target` from a parsed input granule.
    ///
    /// Start time digits are left open since products of the same granule do not
    /// always share the exact same start second. With `auxiliary` any suffix is
    /// accepted (metadata `.xml`, etc.), otherwise only `.h5`.
    pub fn new(input: &GranuleName, target: Product, auxiliary: bool) -> Self {
        let suffix = if auxiliary { "(.*?)" } else { "(h5)" };
        let pattern = format!(
            r"^{product}(-\d{{2}})?_\d{{14}}_({track})({cycle})({granule})_({release})_({version})(.*?)\.{suffix}$",
            product = target.code(),
            track = regex::escape(&input.track),
            cycle = regex::escape(&input.cycle),
            granule = regex::escape(&input.granule),
            release = regex::escape(&input.release),
            version = regex::escape(&input.version),
            suffix = suffix,
        );
        let pattern = Regex::new(&pattern).expect("association pattern built from digits is valid");
        AssociationRule {
            product: target,
            release: input.release.clone(),
            date_directory: input.date_directory(),
            pattern,
        }
    }

    pub fn matches(&self, remote_name: &str) -> bool {
        self.pattern.is_match(remote_name)
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Path segments of the remote directory below the data host.
    pub fn remote_segments(&self) -> [String; 3] {
        [
            "ATLAS".to_string(),
            format!("{}.{}", self.product.code(), self.release),
            self.date_directory.clone(),
        ]
    }
}
