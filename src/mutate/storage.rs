use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

/// Byte-level access to the scene document and its backup.
///
/// Implementations report failures as plain [`io::Error`]; the mutator attaches the operation
/// and path.
pub trait SceneStorage: Send + Sync {
    /// Read the whole file as UTF-8.
    fn read(&self, path: &Path) -> io::Result<String>;
    /// Replace the whole file.
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;
    /// Copy `from` to `to`, replacing `to`.
    fn copy(&self, from: &Path, to: &Path) -> io::Result<()>;
    /// Delete a file.
    fn remove(&self, path: &Path) -> io::Result<()>;
    /// Whether a file exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Local filesystem storage. Writes go through a sibling temp file and a rename.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsStorage;

impl SceneStorage for FsStorage {
    fn read(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        write_atomic(path, contents.as_bytes())
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::copy(from, to).map(|_| ())
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// Write `bytes` to `path` via `<path>.tmp` and a rename, so readers see the old or new file.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path).inspect_err(|_| {
        let _ = std::fs::remove_file(&tmp);
    })
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// In-memory storage for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: Mutex<BTreeMap<PathBuf, String>>,
}

impl MemoryStorage {
    /// Empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage holding one file.
    pub fn with_file(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        let storage = Self::new();
        storage.files.lock().insert(path.into(), contents.into());
        storage
    }

    /// Current contents of a file, if present.
    pub fn contents(&self, path: &Path) -> Option<String> {
        self.files.lock().get(path).cloned()
    }

    /// Paths of all stored files.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.lock().keys().cloned().collect()
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{} does not exist", path.display()),
    )
}

impl SceneStorage for MemoryStorage {
    fn read(&self, path: &Path) -> io::Result<String> {
        self.contents(path).ok_or_else(|| not_found(path))
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        self.files
            .lock()
            .insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<()> {
        let mut files = self.files.lock();
        let contents = files.get(from).cloned().ok_or_else(|| not_found(from))?;
        files.insert(to.to_path_buf(), contents);
        Ok(())
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        self.files
            .lock()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| not_found(path))
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().contains_key(path)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mutate/storage.rs"]
mod tests;
