//! Retry and backoff policy.
//!
//! Transport errors are classified (timeouts, throttling, connection failures)
//! and an exponential backoff decides whether to try again. The default
//! policy makes a single attempt.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use error::FetchError;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
