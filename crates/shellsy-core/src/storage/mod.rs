//! Disk I/O and file lifecycle for downloads.
//!
//! Bodies stream into `<dest>.part`; on success the temp file is synced and
//! atomically renamed onto the destination. A writer dropped without
//! `finalize` removes its temp file.

mod writer;

pub use writer::StorageWriter;

use std::path::{Path, PathBuf};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `file.iso` → `file.iso.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_path_appends_part() {
        let p = temp_path(Path::new("file.iso"));
        assert_eq!(p.to_string_lossy(), "file.iso.part");
        let p2 = temp_path(Path::new("/tmp/archive.zip"));
        assert_eq!(p2.to_string_lossy(), "/tmp/archive.zip.part");
    }

    #[test]
    fn create_write_finalize() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("output.bin");
        let tp = temp_path(&final_path);

        let mut writer = StorageWriter::create(&tp).unwrap();
        writer.write_chunk(b"hello ").unwrap();
        writer.write_chunk(b"world").unwrap();
        assert_eq!(writer.bytes_written(), 11);
        writer.finalize(&final_path).unwrap();

        assert!(!tp.exists());
        assert_eq!(std::fs::read(&final_path).unwrap(), b"hello world");
    }

    #[test]
    fn reset_discards_previous_attempt() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("out.bin");
        let mut writer = StorageWriter::create(&temp_path(&final_path)).unwrap();
        writer.write_chunk(b"garbage from attempt one").unwrap();
        writer.reset().unwrap();
        assert_eq!(writer.bytes_written(), 0);
        writer.write_chunk(b"ok").unwrap();
        writer.finalize(&final_path).unwrap();
        assert_eq!(std::fs::read(&final_path).unwrap(), b"ok");
    }

    #[test]
    fn drop_without_finalize_removes_temp() {
        let dir = tempfile::tempdir().unwrap();
        let tp = dir.path().join("x.part");
        {
            let mut writer = StorageWriter::create(&tp).unwrap();
            writer.write_chunk(b"abc").unwrap();
            assert!(tp.exists());
        }
        assert!(!tp.exists());
    }

    #[test]
    fn stale_temp_file_is_truncated() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("out.bin");
        let tp = temp_path(&final_path);
        std::fs::write(&tp, b"left over from an earlier run").unwrap();

        let mut writer = StorageWriter::create(&tp).unwrap();
        assert_eq!(std::fs::metadata(&tp).unwrap().len(), 0);
        writer.write_chunk(b"fresh").unwrap();
        writer.finalize(&final_path).unwrap();
        assert_eq!(std::fs::read(&final_path).unwrap(), b"fresh");
    }

    #[test]
    fn temp_path_that_is_a_directory_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("out.bin");
        let tp = temp_path(&final_path);
        std::fs::create_dir(&tp).unwrap();

        let err = StorageWriter::create(&tp).err().unwrap();
        assert!(err.to_string().contains("not a regular file"), "got: {err:#}");
        assert!(tp.is_dir());
    }

    #[test]
    fn finalize_replaces_existing_destination() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("out.txt");
        std::fs::write(&final_path, b"old contents").unwrap();
        let mut writer = StorageWriter::create(&temp_path(&final_path)).unwrap();
        writer.write_chunk(b"new").unwrap();
        writer.finalize(&final_path).unwrap();
        assert_eq!(std::fs::read(&final_path).unwrap(), b"new");
    }
}
