//! Transfer error type for retry classification.

use thiserror::Error;

/// Error returned by a single HTTP transfer attempt (curl failure, HTTP error,
/// short body, or storage failure). Kept typed so we can classify and decide
/// retries before converting to anyhow.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, invalid option, etc.).
    #[error(transparent)]
    Curl(#[from] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Transfer completed but fewer bytes arrived than `Content-Length` announced.
    #[error("partial transfer: expected {expected} bytes, got {received}")]
    PartialTransfer { expected: u64, received: u64 },
    /// Disk/storage write failed (e.g. disk full, permission denied). Not retried.
    #[error("storage: {0}")]
    Storage(#[from] std::io::Error),
}
