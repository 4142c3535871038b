//! Transport error type for requests against the data pool.

/// Error returned by a single HTTP request (curl failure, HTTP status, or local write).
/// Kept typed so it can be classified for retries before it becomes an `anyhow::Error`.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, TLS, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// The server refused our Earthdata credentials.
    #[error("HTTP {status} for {url}: check your NASA Earthdata credentials")]
    Unauthorized { url: String, status: u32 },
    /// Any other non-2xx status.
    #[error("HTTP {status} for {url}")]
    Http { url: String, status: u32 },
    /// Body length differs from the advertised `Content-Length`.
    #[error("partial transfer: expected {expected} bytes, got {received}")]
    PartialTransfer { expected: u64, received: u64 },
    /// Writing the body locally failed (disk full, permissions). Not retried.
    #[error("storage: {0}")]
    Storage(#[source] std::io::Error),
}

impl FetchError {
    /// Build the error for a non-2xx `status`.
    pub fn from_status(url: &str, status: u32) -> Self {
        match status {
            401 | 403 => FetchError::Unauthorized {
                url: url.to_string(),
                status,
            },
            _ => FetchError::Http {
                url: url.to_string(),
                status,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_status_maps_auth_failures() {
        assert!(matches!(
            FetchError::from_status("https://h/x", 401),
            FetchError::Unauthorized { status: 401, .. }
        ));
        assert!(matches!(
            FetchError::from_status("https://h/x", 403),
            FetchError::Unauthorized { status: 403, .. }
        ));
        let e = FetchError::from_status("https://h/x", 404);
        assert!(matches!(e, FetchError::Http { status: 404, .. }));
        assert_eq!(e.to_string(), "HTTP 404 for https://h/x");
    }

    #[test]
    fn partial_transfer_message() {
        let e = FetchError::PartialTransfer {
            expected: 10,
            received: 4,
        };
        assert_eq!(e.to_string(), "partial transfer: expected 10 bytes, got 4");
    }
}
