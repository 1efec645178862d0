//! Sequential writer for temp download files.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Writer for a temp download file. Appends body chunks in arrival order.
pub struct StorageWriter {
    file: Option<BufWriter<File>>,
    temp_path: PathBuf,
    written: u64,
}

impl StorageWriter {
    /// Create a new temp file at `temp_path` (e.g. `destination.part`).
    /// An existing regular file there is truncated with a warning; anything else is an error.
    pub fn create(temp_path: &Path) -> Result<Self> {
        match std::fs::symlink_metadata(temp_path) {
            Ok(meta) if meta.is_file() => {
                tracing::warn!(path = %temp_path.display(), len = meta.len(), "overwriting existing temp file");
            }
            Ok(_) => anyhow::bail!(
                "temp path {} exists and is not a regular file",
                temp_path.display()
            ),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(e).with_context(|| format!("failed to inspect temp path {}", temp_path.display()))
            }
        }
        let file = File::options()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(temp_path)
            .with_context(|| format!("failed to create temp file: {}", temp_path.display()))?;
        Ok(StorageWriter {
            file: Some(BufWriter::new(file)),
            temp_path: temp_path.to_path_buf(),
            written: 0,
        })
    }

    fn inner(&mut self) -> io::Result<&mut BufWriter<File>> {
        self.file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "storage writer already closed"))
    }

    /// Append `data` at the current end of the temp file.
    pub fn write_chunk(&mut self, data: &[u8]) -> io::Result<()> {
        self.inner()?.write_all(data)?;
        self.written += data.len() as u64;
        Ok(())
    }

    /// Truncate the temp file back to zero bytes, e.g. before a retry.
    pub fn reset(&mut self) -> io::Result<()> {
        let w = self.inner()?;
        w.flush()?;
        let f = w.get_mut();
        f.set_len(0)?;
        f.seek(SeekFrom::Start(0))?;
        self.written = 0;
        Ok(())
    }

    /// Bytes written since creation or the last `reset`.
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Path to the current temp file.
    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Flush buffered data and sync it to disk.
    pub fn sync(&mut self) -> Result<()> {
        let w = self.inner()?;
        w.flush().context("storage flush failed")?;
        w.get_ref().sync_all().context("storage sync failed")?;
        Ok(())
    }

    /// Sync, then atomically rename the temp file to the final path. Consumes the writer and closes the file.
    /// Fails if `final_path` is on a different filesystem.
    pub fn finalize(mut self, final_path: &Path) -> Result<()> {
        self.sync()?;
        drop(self.file.take());

        if let Err(e) = std::fs::rename(&self.temp_path, final_path) {
            let _ = std::fs::remove_file(&self.temp_path);
            return Err(e).with_context(|| {
                format!(
                    "failed to rename {} to {}",
                    self.temp_path.display(),
                    final_path.display()
                )
            });
        }
        Ok(())
    }
}

impl Drop for StorageWriter {
    fn drop(&mut self) {
        // Still open means finalize never ran: discard the partial file.
        if self.file.take().is_some() {
            match std::fs::remove_file(&self.temp_path) {
                Ok(()) => tracing::debug!(path = %self.temp_path.display(), "removed temp file"),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => tracing::warn!(path = %self.temp_path.display(), "could not remove temp file: {}", e),
            }
        }
    }
}
