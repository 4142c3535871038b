//! CLI for is2sync.

mod sync;

use anyhow::Result;
use clap::Parser;
use is2sync_core::config;
use is2sync_core::product::{Product, UnknownProduct};
use std::path::{Path, PathBuf};

use sync::{run_sync, SyncRequest};

/// Download ICESat-2 granules of another product that match local granule files.
#[derive(Debug, Parser)]
#[command(name = "is2sync")]
#[command(
    about = "Acquire ICESat-2 granules from NSIDC associated with local files",
    long_about = None
)]
pub struct Cli {
    /// NASA Earthdata username.
    #[arg(short = 'U', long)]
    pub user: Option<String>,

    /// Path to a .netrc file holding Earthdata credentials.
    #[arg(short = 'N', long, value_name = "PATH")]
    pub netrc: Option<PathBuf>,

    /// Output directory (default: alongside each input file).
    #[arg(short = 'D', long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// ICESat-2 product to fetch (ATL03, ATL06, ...).
    #[arg(short = 'P', long, value_parser = parse_product, long_help = product_help())]
    pub product: Product,

    /// Also fetch auxiliary files (metadata .xml, ...).
    #[arg(short = 'A', long)]
    pub auxiliary: bool,

    /// Permission mode of downloaded files, octal (default from config: 775).
    #[arg(short = 'M', long, value_parser = parse_mode)]
    pub mode: Option<u32>,

    /// Only list the files that would be transferred.
    #[arg(short = 'L', long)]
    pub list: bool,

    /// Skip files whose local copy is not older than the remote one.
    #[arg(long)]
    pub update: bool,

    /// Local ICESat-2 granule files to find associations for.
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

/// `-P` long help: one line per product in the catalog.
fn product_help() -> String {
    let mut help = String::from("ICESat-2 product to fetch:");
    for p in Product::ALL {
        help.push_str(&format!("\n  {}: {}", p.code(), p.description()));
    }
    help
}

fn parse_product(s: &str) -> Result<Product, UnknownProduct> {
    s.parse()
}

fn parse_mode(s: &str) -> Result<u32, String> {
    config::parse_mode(s).map_err(|e| format!("{:#}", e))
}

/// Expand a leading `~` to `$HOME`. Other paths are returned unchanged.
pub(crate) fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(rest),
        None => path.to_path_buf(),
    }
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        let mode = match cli.mode {
            Some(m) => m,
            None => cfg.default_mode()?,
        };
        let request = SyncRequest {
            user: cli.user,
            netrc: cli.netrc.as_deref().map(expand_tilde),
            directory: cli.directory.as_deref().map(expand_tilde),
            product: cli.product,
            auxiliary: cli.auxiliary,
            mode,
            list_only: cli.list,
            update: cli.update,
            files: cli.files.iter().map(|f| expand_tilde(f)).collect(),
        };
        run_sync(&cfg, request)
    }
}

#[cfg(test)]
mod tests;
