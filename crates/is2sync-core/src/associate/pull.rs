//! Pull one remote entry into a local file.

use anyhow::{Context, Result};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::AssociateOptions;
use crate::http::HttpFetch;
use crate::listing::RemoteEntry;
use crate::retry::{run_with_retry, FetchError};
use crate::storage::PartFile;

/// Why a file is (or would be) transferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullReason {
    /// No local copy existed.
    New,
    /// Remote copy is newer than the local one.
    Overwrite,
    /// Local copy replaced unconditionally.
    Clobber,
}

impl PullReason {
    pub fn label(self) -> &'static str {
        match self {
            PullReason::New => "new",
            PullReason::Overwrite => "overwrite",
            PullReason::Clobber => "clobber",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullStatus {
    Transferred { bytes: u64 },
    /// `--list`: reported only.
    Listed,
    /// `--update`: local copy is current.
    UpToDate,
}

#[derive(Debug, Clone)]
pub struct PulledFile {
    pub remote: RemoteEntry,
    pub local: PathBuf,
    /// `None` when the file was up to date.
    pub reason: Option<PullReason>,
    pub status: PullStatus,
}

fn decide(local: &Path, remote_mtime: Option<SystemTime>, update: bool) -> Result<Option<PullReason>> {
    let meta = match std::fs::metadata(local) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Some(PullReason::New)),
        Err(e) => return Err(e).with_context(|| format!("stat {}", local.display())),
    };
    if !update {
        return Ok(Some(PullReason::Clobber));
    }
    let local_mtime = meta
        .modified()
        .with_context(|| format!("mtime of {}", local.display()))?;
    match remote_mtime {
        Some(remote) if remote <= local_mtime => Ok(None),
        _ => Ok(Some(PullReason::Overwrite)),
    }
}

/// Download `entry` to `local` unless the options say to skip or only list it.
pub fn pull_entry(
    client: &mut dyn HttpFetch,
    entry: RemoteEntry,
    local: &Path,
    opts: &AssociateOptions,
) -> Result<PulledFile> {
    let remote_mtime = entry.last_modified.map(SystemTime::from);
    let Some(reason) = decide(local, remote_mtime, opts.update)? else {
        tracing::debug!(local = %local.display(), "local copy is current");
        return Ok(PulledFile {
            remote: entry,
            local: local.to_path_buf(),
            reason: None,
            status: PullStatus::UpToDate,
        });
    };

    if opts.list_only {
        return Ok(PulledFile {
            remote: entry,
            local: local.to_path_buf(),
            reason: Some(reason),
            status: PullStatus::Listed,
        });
    }

    let url = entry.url.as_str();
    let (part, info) = run_with_retry(&opts.retry, || {
        let mut part = PartFile::create(local)
            .map_err(|e| FetchError::Storage(io::Error::new(io::ErrorKind::Other, format!("{:#}", e))))?;
        match client.get_to_writer(url, &mut part) {
            Ok(info) => Ok((part, info)),
            Err(e) => {
                part.discard();
                Err(e)
            }
        }
    })
    .with_context(|| format!("download {}", url))?;

    // Index pages without a date column fall back to the response header.
    let mtime = remote_mtime.or_else(|| info.headers.last_modified.map(SystemTime::from));
    part.finalize(mtime, opts.mode)?;
    tracing::info!(
        url = %url,
        local = %local.display(),
        bytes = info.bytes,
        reason = reason.label(),
        mode = format!("{:o}", opts.mode),
        "downloaded"
    );

    Ok(PulledFile {
        remote: entry,
        local: local.to_path_buf(),
        reason: Some(reason),
        status: PullStatus::Transferred { bytes: info.bytes },
    })
}
