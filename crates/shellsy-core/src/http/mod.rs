//! Blocking HTTP GET over libcurl's easy interface.
//!
//! One function, [`get`], streams a response body into a caller-supplied sink
//! and reports the final status and headers. Status checks are left to the
//! caller so that JSON error bodies (see `exchange_rate`) can still be read.

mod parse;

pub use parse::ResponseHeaders;

use crate::config::DownloadConfig;
use crate::retry::FetchError;
use std::io;
use std::str;
use std::time::Duration;

/// Transfer options applied to every curl handle.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub low_speed_limit: u32,
    pub low_speed_time: Duration,
    pub max_redirections: u32,
    pub user_agent: String,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self::from(&DownloadConfig::default())
    }
}

impl From<&DownloadConfig> for HttpOptions {
    fn from(cfg: &DownloadConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            timeout: Duration::from_secs(cfg.timeout_secs),
            low_speed_limit: cfg.low_speed_limit_bytes,
            low_speed_time: Duration::from_secs(cfg.low_speed_time_secs),
            max_redirections: cfg.max_redirections,
            user_agent: cfg.user_agent.clone(),
        }
    }
}

impl HttpOptions {
    fn apply(&self, easy: &mut curl::easy::Easy) -> Result<(), curl::Error> {
        easy.follow_location(true)?;
        easy.max_redirections(self.max_redirections)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;
        easy.low_speed_limit(self.low_speed_limit)?;
        easy.low_speed_time(self.low_speed_time)?;
        easy.useragent(&self.user_agent)?;
        Ok(())
    }
}

/// Status, headers and byte count of a completed GET.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u32,
    pub headers: ResponseHeaders,
    /// Body bytes handed to the sink.
    pub received: u64,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Fails with `FetchError::Http` for non-2xx statuses.
    pub fn ensure_success(&self) -> Result<(), FetchError> {
        if self.is_success() {
            Ok(())
        } else {
            Err(FetchError::Http(self.status))
        }
    }

    /// Fails with `FetchError::PartialTransfer` when fewer bytes arrived than announced.
    pub fn ensure_complete(&self) -> Result<(), FetchError> {
        match self.headers.content_length {
            Some(expected) if self.received < expected => Err(FetchError::PartialTransfer {
                expected,
                received: self.received,
            }),
            _ => Ok(()),
        }
    }
}

/// Performs a GET for `url`, following redirects, and passes each body chunk to `on_data`.
///
/// A sink error aborts the transfer and is returned as `FetchError::Storage`.
/// Runs in the current thread; call from `spawn_blocking` if used from async code.
pub fn get<F>(url: &str, opts: &HttpOptions, mut on_data: F) -> Result<Response, FetchError>
where
    F: FnMut(&[u8]) -> io::Result<()>,
{
    let mut header_lines: Vec<String> = Vec::new();
    let mut received = 0u64;
    let mut sink_err: Option<io::Error> = None;

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    opts.apply(&mut easy)?;

    let outcome = {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                let line = s.trim_end();
                // Each redirect hop starts a fresh header block; keep only the last one.
                if line.starts_with("HTTP/") {
                    header_lines.clear();
                }
                header_lines.push(line.to_string());
            }
            true
        })?;
        transfer.write_function(|data| match on_data(data) {
            Ok(()) => {
                received += data.len() as u64;
                Ok(data.len())
            }
            Err(e) => {
                sink_err = Some(e);
                Ok(0) // abort transfer
            }
        })?;
        transfer.perform()
    };

    if let Some(e) = sink_err {
        return Err(FetchError::Storage(e));
    }
    outcome?;

    let status = easy.response_code()?;
    let headers = parse::parse_headers(&header_lines);
    tracing::debug!(status, received, "GET finished");
    Ok(Response {
        status,
        headers,
        received,
    })
}

/// Performs a GET and buffers the whole body in memory.
pub fn get_bytes(url: &str, opts: &HttpOptions) -> Result<(Response, Vec<u8>), FetchError> {
    let mut body = Vec::new();
    let response = get(url, opts, |chunk| {
        body.extend_from_slice(chunk);
        Ok(())
    })?;
    Ok((response, body))
}
