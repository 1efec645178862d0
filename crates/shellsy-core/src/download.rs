//! `dload`: fetch one URL into one file.
//!
//! The body streams into `<dest>.part` and is renamed onto the destination only
//! after the status, length and optional checksum all check out. Retryable
//! failures restart the transfer from byte zero.

use crate::checksum;
use crate::config::ShellsyConfig;
use crate::filename;
use crate::http::{self, HttpOptions};
use crate::retry::{run_with_retry, RetryPolicy};
use crate::storage::{self, StorageWriter};
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use url::Url;

/// Per-invocation download settings.
#[derive(Debug, Clone, Default)]
pub struct DownloadOptions {
    pub http: HttpOptions,
    pub retry: RetryPolicy,
    /// Refuse to replace an existing destination file.
    pub no_clobber: bool,
    /// Expected SHA-256 (hex) of the body.
    pub expected_sha256: Option<String>,
}

impl DownloadOptions {
    pub fn from_config(cfg: &ShellsyConfig) -> Self {
        Self {
            http: HttpOptions::from(&cfg.download),
            retry: RetryPolicy::from(&cfg.retry),
            no_clobber: false,
            expected_sha256: None,
        }
    }
}

/// What a successful download produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadReport {
    pub url: String,
    pub path: PathBuf,
    pub bytes: u64,
    /// Verified digest, when one was requested.
    pub sha256: Option<String>,
}

/// Parse `raw` as an absolute http(s) URL.
pub fn parse_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).with_context(|| format!("invalid URL: {raw}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => bail!("unsupported URL scheme '{other}' (expected http or https)"),
    }
}

/// The file a download of `url` to `dest` ends up in: `dest` itself, or a
/// URL-derived name inside it when `dest` is an existing directory.
pub fn resolve_destination(url: &Url, dest: &Path) -> PathBuf {
    if dest.is_dir() {
        dest.join(filename::filename_for_url(url))
    } else {
        dest.to_path_buf()
    }
}

/// Downloads `url` to `dest`.
///
/// Blocking; call from `spawn_blocking` if used from async code. On error the
/// destination is left as it was and no `.part` file remains.
pub fn download_to_path(url: &str, dest: &Path, opts: &DownloadOptions) -> Result<DownloadReport> {
    let url = parse_url(url)?;
    let expected = opts
        .expected_sha256
        .as_deref()
        .map(checksum::parse_sha256)
        .transpose()?;

    let final_path = resolve_destination(&url, dest);
    if opts.no_clobber && final_path.exists() {
        bail!("{} already exists", final_path.display());
    }

    let temp = storage::temp_path(&final_path);
    let mut writer = StorageWriter::create(&temp)?;
    tracing::info!(url = %url, path = %final_path.display(), "download started");

    let response = run_with_retry(&opts.retry, |attempt| {
        if attempt > 1 {
            writer.reset()?;
        }
        let response = http::get(url.as_str(), &opts.http, |chunk| writer.write_chunk(chunk))?;
        response.ensure_success()?;
        response.ensure_complete()?;
        Ok(response)
    })
    .with_context(|| format!("GET {url} failed"))?;

    writer.sync()?;
    let sha256 = match expected {
        Some(ref want) => Some(checksum::verify_sha256(writer.temp_path(), want)?),
        None => None,
    };
    writer.finalize(&final_path)?;

    tracing::info!(
        url = %url,
        path = %final_path.display(),
        bytes = response.received,
        "download complete"
    );
    Ok(DownloadReport {
        url: url.to_string(),
        path: final_path,
        bytes: response.received,
        sha256,
    })
}
