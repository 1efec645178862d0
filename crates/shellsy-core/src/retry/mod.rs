//! Retry and backoff policy.
//!
//! Classifies transfer failures (timeouts, throttling, connection resets,
//! short bodies) and decides exponential backoff so that `dload` and
//! `extrate` share a consistent policy.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use error::FetchError;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
