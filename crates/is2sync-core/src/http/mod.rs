//! Authenticated HTTP access to the NSIDC data pool.
//!
//! `HttpFetch` is the seam between the association flow and the transport;
//! `EarthdataSession` implements it with a single reused libcurl handle.

mod headers;
mod session;

pub use headers::ResponseHeaders;
pub use session::{EarthdataSession, SessionOptions};

use std::io::Write;

use crate::retry::{classify_curl_error, ErrorKind, FetchError};
use crate::url_model::directory_url;

/// Outcome of a streamed GET.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferInfo {
    /// Body bytes handed to the writer.
    pub bytes: u64,
    pub headers: ResponseHeaders,
}

/// Blocking GET operations needed to list and download granules.
pub trait HttpFetch {
    /// GET `url` and return the body as text (lossy UTF-8).
    fn get_text(&mut self, url: &str) -> Result<String, FetchError>;

    /// GET `url`, streaming the body into `out`. Implementations must fail with
    /// `FetchError::PartialTransfer` when the body length differs from `Content-Length`.
    fn get_to_writer(&mut self, url: &str, out: &mut dyn Write) -> Result<TransferInfo, FetchError>;

    /// Confirm the data pool is reachable and accepts our credentials by
    /// listing `{data_host}/ATLAS/`.
    fn check_credentials(&mut self, data_host: &str) -> anyhow::Result<()> {
        let url = directory_url(data_host, &["ATLAS".to_string()])?;
        match self.get_text(url.as_str()) {
            Ok(_) => {
                tracing::info!(url = %url, "Earthdata credentials accepted");
                Ok(())
            }
            Err(e @ FetchError::Unauthorized { .. }) => {
                Err(anyhow::Error::new(e).context("NASA Earthdata credential check failed"))
            }
            Err(FetchError::Curl(e)) if classify_curl_error(&e) != ErrorKind::Other => Err(
                anyhow::Error::new(e).context(format!("check internet connection ({})", url)),
            ),
            Err(e) => Err(anyhow::Error::new(e).context("credential check failed")),
        }
    }
}
