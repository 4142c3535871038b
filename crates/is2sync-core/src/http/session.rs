//! libcurl session carrying Earthdata Login credentials and cookies.
//!
//! NSIDC redirects data requests through `urs.earthdata.nasa.gov` and back,
//! setting a session cookie on the way. The handle keeps its in-memory cookie
//! jar between requests and sends basic credentials to every host in the
//! redirect chain.

use curl::easy::{Auth, Easy};
use std::io::{self, Write};
use std::str;
use std::time::Duration;

use super::headers::parse_headers;
use super::{HttpFetch, TransferInfo};
use crate::config::Is2SyncConfig;
use crate::credentials::Credentials;
use crate::retry::{run_with_retry, FetchError, RetryPolicy};

/// Transport settings for a session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub connect_timeout: Duration,
    /// Abort when throughput stays below `low_speed_limit` bytes/s for `low_speed_time`.
    pub low_speed_limit: u32,
    pub low_speed_time: Duration,
    /// Applied to index listings and the credential check. Downloads are retried by the caller.
    pub retry: RetryPolicy,
}

impl Default for SessionOptions {
    fn default() -> Self {
        SessionOptions::from(&Is2SyncConfig::default())
    }
}

impl From<&Is2SyncConfig> for SessionOptions {
    fn from(cfg: &Is2SyncConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            low_speed_limit: cfg.low_speed_limit_bytes,
            low_speed_time: Duration::from_secs(cfg.low_speed_time_secs),
            retry: cfg
                .retry
                .as_ref()
                .map(RetryPolicy::from)
                .unwrap_or_default(),
        }
    }
}

/// Authenticated, cookie-keeping HTTP session. Requests run one at a time.
pub struct EarthdataSession {
    easy: Easy,
    retry: RetryPolicy,
}

impl EarthdataSession {
    pub fn new(credentials: &Credentials, opts: &SessionOptions) -> Result<Self, FetchError> {
        let mut easy = Easy::new();
        easy.username(&credentials.username)?;
        easy.password(&credentials.password)?;
        let mut auth = Auth::new();
        auth.basic(true);
        easy.http_auth(&auth)?;
        // Credentials must survive the redirect to the login host and back.
        easy.unrestricted_auth(true)?;
        // Empty file name turns on the in-memory cookie engine.
        easy.cookie_file("")?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.useragent(concat!("is2sync/", env!("CARGO_PKG_VERSION")))?;
        easy.connect_timeout(opts.connect_timeout)?;
        easy.low_speed_limit(opts.low_speed_limit)?;
        easy.low_speed_time(opts.low_speed_time)?;

        Ok(EarthdataSession {
            easy,
            retry: opts.retry,
        })
    }

    /// One GET, body fed to `sink`. Verifies status and `Content-Length`.
    fn perform(
        &mut self,
        url: &str,
        sink: &mut dyn FnMut(&[u8]) -> io::Result<()>,
    ) -> Result<TransferInfo, FetchError> {
        let mut header_lines: Vec<String> = Vec::new();
        let mut write_error: Option<io::Error> = None;
        let mut received: u64 = 0;

        self.easy.url(url)?;
        self.easy.get(true)?;

        let result = {
            let mut transfer = self.easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    header_lines.push(s.trim_end().to_string());
                }
                true
            })?;
            transfer.write_function(|data| match sink(data) {
                Ok(()) => {
                    received += data.len() as u64;
                    Ok(data.len())
                }
                Err(e) => {
                    write_error = Some(e);
                    Ok(0) // abort transfer
                }
            })?;
            transfer.perform()
        };

        if let Err(e) = result {
            if e.is_write_error() {
                if let Some(io_err) = write_error.take() {
                    return Err(FetchError::Storage(io_err));
                }
            }
            return Err(FetchError::Curl(e));
        }

        let code = self.easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(FetchError::from_status(url, code));
        }

        let headers = parse_headers(&header_lines);
        if let Some(expected) = headers.content_length {
            if expected != received {
                return Err(FetchError::PartialTransfer { expected, received });
            }
        }

        Ok(TransferInfo {
            bytes: received,
            headers,
        })
    }
}

impl HttpFetch for EarthdataSession {
    fn get_text(&mut self, url: &str) -> Result<String, FetchError> {
        let policy = self.retry;
        let body = run_with_retry(&policy, || {
            let mut body: Vec<u8> = Vec::new();
            self.perform(url, &mut |data| {
                body.extend_from_slice(data);
                Ok(())
            })?;
            Ok(body)
        })?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    fn get_to_writer(&mut self, url: &str, out: &mut dyn Write) -> Result<TransferInfo, FetchError> {
        self.perform(url, &mut |data| out.write_all(data))
    }
}
