//! File-based snapshot backend for persistent storage.

use crate::backend::SnapshotBackend;
use crate::error::{StorageError, StorageResult};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

/// A file-based snapshot backend.
///
/// The snapshot lives in a single file. Replacement goes through a
/// temporary file in the same directory followed by a rename, so a crash
/// mid-write leaves the previous snapshot intact.
///
/// # Durability
///
/// `persist()` calls `File::sync_all()` on the temporary file before the
/// rename, so the new snapshot is on disk before it becomes visible.
///
/// # Thread Safety
///
/// A mutex serializes writers; `load` takes the same lock so it never
/// observes a half-finished replacement on platforms where rename is not
/// atomic against open readers.
///
/// # Example
///
/// ```no_run
/// use liftlog_storage::{SnapshotBackend, FileBackend};
/// use std::path::Path;
///
/// let backend = FileBackend::open(Path::new("records.json")).unwrap();
/// backend.persist(b"[]").unwrap();
/// ```
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileBackend {
    /// Opens a file backend at the given path.
    ///
    /// The file itself is not created until the first `persist`; a missing
    /// file reads as an empty (never persisted) snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory does not exist.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(StorageError::Unavailable(format!(
                    "parent directory does not exist: {}",
                    parent.display()
                )));
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            lock: Mutex::new(()),
        })
    }

    /// Opens a file backend, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created.
    pub fn open_with_create_dirs(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Self::open(path)
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "snapshot".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotBackend for FileBackend {
    fn load(&self) -> StorageResult<Option<Vec<u8>>> {
        let _guard = self.lock.lock();

        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(Some(data))
    }

    fn persist(&self, data: &[u8]) -> StorageResult<()> {
        let _guard = self.lock.lock();

        let tmp = self.tmp_path();
        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&tmp)?;
            file.write_all(data)?;
            file.sync_all()?;
        }

        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempdir().unwrap();
        let backend = FileBackend::open(&dir.path().join("records.json")).unwrap();
        assert!(backend.load().unwrap().is_none());
    }

    #[test]
    fn persist_then_load() {
        let dir = tempdir().unwrap();
        let backend = FileBackend::open(&dir.path().join("records.json")).unwrap();

        backend.persist(b"[1,2,3]").unwrap();
        assert_eq!(backend.load().unwrap().as_deref(), Some(&b"[1,2,3]"[..]));
    }

    #[test]
    fn persist_replaces_previous_snapshot() {
        let dir = tempdir().unwrap();
        let backend = FileBackend::open(&dir.path().join("records.json")).unwrap();

        backend.persist(b"old").unwrap();
        backend.persist(b"new").unwrap();
        assert_eq!(backend.load().unwrap().as_deref(), Some(&b"new"[..]));
    }

    #[test]
    fn snapshot_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("records.json");

        {
            let backend = FileBackend::open(&path).unwrap();
            backend.persist(b"durable").unwrap();
        }

        let backend = FileBackend::open(&path).unwrap();
        assert_eq!(backend.load().unwrap().as_deref(), Some(&b"durable"[..]));
    }

    #[test]
    fn missing_parent_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("records.json");
        assert!(matches!(
            FileBackend::open(&path),
            Err(StorageError::Unavailable(_))
        ));
    }

    #[test]
    fn create_with_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("path").join("records.json");

        let backend = FileBackend::open_with_create_dirs(&path).unwrap();
        backend.persist(b"x").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn no_tmp_file_left_behind() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("records.json");
        let backend = FileBackend::open(&path).unwrap();

        backend.persist(b"data").unwrap();
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path() != path)
            .collect();
        assert!(leftovers.is_empty());
    }
}
