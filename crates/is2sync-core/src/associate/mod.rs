//! Fetch the granules associated with local input files.
//!
//! For each input: parse its granule name, derive the association rule for the
//! target product, list the remote date directory, and pull every match into
//! the output directory. Names that are not granules are skipped; every other
//! failure aborts the run.

mod pull;

pub use pull::{pull_entry, PullReason, PullStatus, PulledFile};

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use url::Url;

use crate::granule::{AssociationRule, GranuleError, GranuleName};
use crate::http::HttpFetch;
use crate::listing::list_matching;
use crate::product::Product;
use crate::retry::RetryPolicy;
use crate::url_model::directory_url;

/// What to fetch and how to store it.
#[derive(Debug, Clone)]
pub struct AssociateOptions {
    pub product: Product,
    /// Output directory; `None` writes next to each input file.
    pub directory: Option<PathBuf>,
    /// Also fetch auxiliary (non-HDF5) files of each granule.
    pub auxiliary: bool,
    /// Permission mode applied to every downloaded file.
    pub mode: u32,
    /// Report what would be transferred without downloading.
    pub list_only: bool,
    /// Skip files whose local copy is at least as new as the remote one.
    pub update: bool,
    pub data_host: String,
    pub retry: RetryPolicy,
}

impl AssociateOptions {
    pub fn new(product: Product, data_host: impl Into<String>) -> Self {
        Self {
            product,
            directory: None,
            auxiliary: false,
            mode: 0o775,
            list_only: false,
            update: false,
            data_host: data_host.into(),
            retry: RetryPolicy::default(),
        }
    }
}

/// Result for one input file.
#[derive(Debug)]
pub enum InputOutcome {
    /// Name did not follow the granule convention; nothing was requested.
    Skipped { input: PathBuf, reason: GranuleError },
    Synced {
        input: PathBuf,
        directory: Url,
        files: Vec<PulledFile>,
    },
}

impl InputOutcome {
    pub fn input(&self) -> &Path {
        match self {
            InputOutcome::Skipped { input, .. } | InputOutcome::Synced { input, .. } => input,
        }
    }
}

/// Runs the association flow against one `HttpFetch` client.
pub struct Associator<'a> {
    client: &'a mut dyn HttpFetch,
    opts: AssociateOptions,
}

impl<'a> Associator<'a> {
    pub fn new(client: &'a mut dyn HttpFetch, opts: AssociateOptions) -> Self {
        Self { client, opts }
    }

    pub fn options(&self) -> &AssociateOptions {
        &self.opts
    }

    /// Process one input file.
    pub fn process(&mut self, input: &Path) -> Result<InputOutcome> {
        let granule = match GranuleName::from_path(input) {
            Ok(g) => g,
            Err(reason) => {
                tracing::warn!(input = %input.display(), "skipping: {}", reason);
                return Ok(InputOutcome::Skipped {
                    input: input.to_path_buf(),
                    reason,
                });
            }
        };

        let rule = AssociationRule::new(&granule, self.opts.product, self.opts.auxiliary);
        let directory = directory_url(&self.opts.data_host, &rule.remote_segments())?;
        let local_dir = self.local_directory(input)?;

        let entries = list_matching(self.client, &directory, &rule)?;
        if entries.is_empty() {
            tracing::info!(input = %input.display(), directory = %directory, "no associated files found");
        }

        let mut files = Vec::with_capacity(entries.len());
        for entry in entries {
            let local = local_dir.join(&entry.name);
            let pulled = pull_entry(self.client, entry, &local, &self.opts)
                .with_context(|| format!("sync {}", local.display()))?;
            files.push(pulled);
        }

        Ok(InputOutcome::Synced {
            input: input.to_path_buf(),
            directory,
            files,
        })
    }

    fn local_directory(&self, input: &Path) -> Result<PathBuf> {
        let dir = match &self.opts.directory {
            Some(d) => d.clone(),
            None => match input.parent() {
                Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
                _ => PathBuf::from("."),
            },
        };
        if !self.opts.list_only && !dir.is_dir() {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("create output directory {}", dir.display()))?;
            tracing::info!("created output directory {}", dir.display());
        }
        Ok(dir)
    }
}
