//! Sequential writer for a `.part` download file.

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::temp_path;

const BUF_SIZE: usize = 16 * 1024;

/// Temp file receiving a download body. Dropping it without `finalize`
/// leaves the `.part` file behind; call `discard` on failure.
pub struct PartFile {
    out: BufWriter<File>,
    temp_path: PathBuf,
    final_path: PathBuf,
}

impl PartFile {
    /// Create (truncating) the temp file for `final_path`.
    pub fn create(final_path: &Path) -> Result<Self> {
        let temp_path = temp_path(final_path);
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .with_context(|| format!("failed to create temp file: {}", temp_path.display()))?;
        Ok(PartFile {
            out: BufWriter::with_capacity(BUF_SIZE, file),
            temp_path,
            final_path: final_path.to_path_buf(),
        })
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Flush, fsync, apply `mtime` and `mode`, then rename over the final path.
    /// The temp file is removed if any of these steps fails.
    pub fn finalize(self, mtime: Option<SystemTime>, mode: u32) -> Result<PathBuf> {
        let PartFile {
            out,
            temp_path,
            final_path,
        } = self;
        match commit(out, &temp_path, &final_path, mtime, mode) {
            Ok(()) => Ok(final_path),
            Err(e) => {
                remove_temp(&temp_path);
                Err(e)
            }
        }
    }

    /// Remove the temp file after a failed transfer.
    pub fn discard(self) {
        drop(self.out);
        remove_temp(&self.temp_path);
    }
}

fn commit(
    out: BufWriter<File>,
    temp_path: &Path,
    final_path: &Path,
    mtime: Option<SystemTime>,
    mode: u32,
) -> Result<()> {
    let file = out
        .into_inner()
        .map_err(|e| e.into_error())
        .with_context(|| format!("flush {}", temp_path.display()))?;
    file.sync_all()
        .with_context(|| format!("sync {}", temp_path.display()))?;
    if let Some(t) = mtime {
        file.set_modified(t)
            .with_context(|| format!("set mtime on {}", temp_path.display()))?;
    }
    set_mode(&file, mode).with_context(|| format!("chmod {:o} {}", mode, temp_path.display()))?;
    drop(file);

    std::fs::rename(temp_path, final_path).with_context(|| {
        format!(
            "failed to rename {} to {}",
            temp_path.display(),
            final_path.display()
        )
    })
}

fn remove_temp(temp_path: &Path) {
    if let Err(e) = std::fs::remove_file(temp_path) {
        if e.kind() != io::ErrorKind::NotFound {
            tracing::warn!("could not remove {}: {}", temp_path.display(), e);
        }
    }
}

impl Write for PartFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.out.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

#[cfg(unix)]
fn set_mode(file: &File, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(file: &File, mode: u32) -> io::Result<()> {
    let mut perms = file.metadata()?.permissions();
    perms.set_readonly(mode & 0o222 == 0);
    file.set_permissions(perms)
}
