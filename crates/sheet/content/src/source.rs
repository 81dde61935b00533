//! Where list files are read from and written to.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use tempfile::NamedTempFile;

/// Byte storage addressed by path.
///
/// `write` must replace the whole file or leave the previous contents in
/// place; readers never observe a partially written file.
pub trait DataSource {
    fn read(&self, path: &Path) -> io::Result<String>;

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;
}

/// Files on disk, optionally relative to a root directory.
#[derive(Clone, Debug, Default)]
pub struct FsSource {
    root: Option<PathBuf>,
}

impl FsSource {
    /// Paths are used as given.
    pub fn new() -> Self {
        Self::default()
    }

    /// Relative paths are resolved against `root`.
    pub fn rooted(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl DataSource for FsSource {
    fn read(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(self.resolve(path))
    }

    /// Writes to a temporary file next to the target, then renames it over
    /// the target.
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let target = self.resolve(path);
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut temp = NamedTempFile::new_in(&dir)?;
        temp.write_all(contents)?;
        temp.as_file().sync_all()?;
        temp.persist(&target).map_err(|err| err.error)?;
        Ok(())
    }
}

/// In-memory files, for tests and for embedding bundled content.
#[derive(Debug, Default)]
pub struct MemorySource {
    files: RwLock<BTreeMap<PathBuf, String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }

    pub fn insert(&self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.into(), contents.into());
    }

    pub fn get(&self, path: &Path) -> Option<String> {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
    }
}

impl DataSource for MemorySource {
    fn read(&self, path: &Path) -> io::Result<String> {
        self.get(path).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{} not found", path.display()))
        })
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let text = String::from_utf8(contents.to_vec())
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        self.insert(path, text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_source_replaces_files_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let source = FsSource::rooted(dir.path());
        let path = Path::new("list.json");

        source.write(path, b"first").unwrap();
        source.write(path, b"second").unwrap();
        assert_eq!(source.read(path).unwrap(), "second");
        // Only the target remains; the temporary file was renamed over it.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn memory_source_round_trips() {
        let source = MemorySource::new().with_file("a.json", "{}");
        assert_eq!(source.read(Path::new("a.json")).unwrap(), "{}");
        assert_eq!(
            source.read(Path::new("missing.json")).unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
        source.write(Path::new("b.json"), b"[]").unwrap();
        assert_eq!(source.get(Path::new("b.json")).as_deref(), Some("[]"));
    }
}
