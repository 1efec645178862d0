//! SHA-256 verification of downloaded files.

use anyhow::{bail, Context, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const BUF_SIZE: usize = 64 * 1024;

/// Compute SHA-256 of a file and return the digest as lowercase hex.
/// Reads in chunks to keep memory use bounded.
pub fn sha256_path(path: &Path) -> Result<String> {
    let mut f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; BUF_SIZE];
    loop {
        let n = f
            .read(&mut buf)
            .with_context(|| format!("read {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Validate a user-supplied SHA-256 digest and return it lowercased.
pub fn parse_sha256(expected: &str) -> Result<String> {
    let trimmed = expected.trim();
    let bytes = hex::decode(trimmed).with_context(|| format!("invalid sha256 digest: {trimmed}"))?;
    if bytes.len() != 32 {
        bail!(
            "invalid sha256 digest: expected 64 hex characters, got {}",
            trimmed.len()
        );
    }
    Ok(trimmed.to_ascii_lowercase())
}

/// Hash `path` and compare against `expected` (already normalized by `parse_sha256`).
/// Returns the computed digest on match.
pub fn verify_sha256(path: &Path, expected: &str) -> Result<String> {
    let actual = sha256_path(path)?;
    if actual != expected {
        bail!("sha256 mismatch: expected {expected}, got {actual}");
    }
    Ok(actual)
}
