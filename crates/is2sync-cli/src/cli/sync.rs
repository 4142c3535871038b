//! Resolve credentials, open the session and sync every input file.

use anyhow::Result;
use is2sync_core::associate::{AssociateOptions, Associator, InputOutcome, PullStatus};
use is2sync_core::config::Is2SyncConfig;
use is2sync_core::credentials::{self, CredentialSource, Credentials, Prompt, TerminalPrompt};
use is2sync_core::http::{EarthdataSession, HttpFetch, SessionOptions};
use is2sync_core::product::Product;
use is2sync_core::retry::RetryPolicy;
use std::io::{self, Write};
use std::path::PathBuf;

/// Parsed command line, paths already expanded.
#[derive(Debug)]
pub struct SyncRequest {
    pub user: Option<String>,
    pub netrc: Option<PathBuf>,
    pub directory: Option<PathBuf>,
    pub product: Product,
    pub auxiliary: bool,
    pub mode: u32,
    pub list_only: bool,
    pub update: bool,
    pub files: Vec<PathBuf>,
}

/// Counts reported at the end of a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncSummary {
    pub transferred: usize,
    pub listed: usize,
    pub skipped: usize,
}

pub fn run_sync(cfg: &Is2SyncConfig, req: SyncRequest) -> Result<()> {
    let session_opts = SessionOptions::from(cfg);
    let stdout = io::stdout();
    let summary = sync_with(
        cfg,
        req,
        &mut TerminalPrompt,
        |creds| Ok(EarthdataSession::new(creds, &session_opts)?),
        &mut stdout.lock(),
    )?;
    tracing::info!(
        transferred = summary.transferred,
        listed = summary.listed,
        skipped = summary.skipped,
        "sync finished"
    );
    Ok(())
}

/// The whole run: credentials from `prompt`, a client from `connect`, the
/// credential check, then every input in order. Progress goes to `out`.
pub fn sync_with<C, F>(
    cfg: &Is2SyncConfig,
    req: SyncRequest,
    prompt: &mut dyn Prompt,
    connect: F,
    out: &mut dyn Write,
) -> Result<SyncSummary>
where
    C: HttpFetch,
    F: FnOnce(&Credentials) -> Result<C>,
{
    let source = CredentialSource {
        user: req.user,
        netrc: req.netrc,
    };
    let creds = credentials::resolve(&source, &cfg.earthdata_host, prompt)?;
    let mut client = connect(&creds)?;
    client.check_credentials(&cfg.data_host)?;

    let opts = AssociateOptions {
        product: req.product,
        directory: req.directory,
        auxiliary: req.auxiliary,
        mode: req.mode,
        list_only: req.list_only,
        update: req.update,
        data_host: cfg.data_host.clone(),
        retry: cfg
            .retry
            .as_ref()
            .map(RetryPolicy::from)
            .unwrap_or_default(),
    };
    tracing::info!(
        product = %opts.product,
        inputs = req.files.len(),
        list_only = opts.list_only,
        update = opts.update,
        "starting sync"
    );

    let mut associator = Associator::new(&mut client, opts);
    let mut summary = SyncSummary::default();
    for input in &req.files {
        writeln!(out, "{}", input.display())?;
        let outcome = associator.process(input)?;
        report(&outcome, associator.options().product, &mut summary, out)?;
    }
    Ok(summary)
}

fn report(
    outcome: &InputOutcome,
    product: Product,
    summary: &mut SyncSummary,
    out: &mut dyn Write,
) -> io::Result<()> {
    let files = match outcome {
        InputOutcome::Skipped { reason, .. } => {
            summary.skipped += 1;
            return writeln!(out, "Skipping {}: {}", outcome.input().display(), reason);
        }
        InputOutcome::Synced { files, .. } => files,
    };
    if files.is_empty() {
        writeln!(
            out,
            "No {} files associated with {}",
            product,
            outcome.input().display()
        )?;
    }
    for f in files {
        let Some(reason) = f.reason else {
            continue;
        };
        match f.status {
            PullStatus::Transferred { .. } => summary.transferred += 1,
            PullStatus::Listed => summary.listed += 1,
            PullStatus::UpToDate => {}
        }
        writeln!(
            out,
            "{} -->\n\t{} ({})",
            f.remote.url,
            f.local.display(),
            reason.label()
        )?;
    }
    Ok(())
}
