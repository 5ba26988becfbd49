//! Storage capability injected into the sync engine
//!
//! The engine never touches the filesystem directly; it reads and writes
//! through a [`Storage`] so hosts can substitute their own access layer
//! (a privileged helper, a sandbox, or [`MemoryStorage`] in tests).

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{Error, NormalizedPath, Result, io};

/// Text file access required by the sync engine.
pub trait Storage {
    /// Read a whole text file.
    fn read_text(&self, path: &NormalizedPath) -> Result<String>;

    /// Replace a text file's content, creating parent directories as needed.
    fn write_text(&self, path: &NormalizedPath, content: &str) -> Result<()>;

    /// Check whether a file exists.
    fn exists(&self, path: &NormalizedPath) -> bool;

    /// Read a file if it exists, `None` otherwise.
    fn read_optional(&self, path: &NormalizedPath) -> Result<Option<String>> {
        if self.exists(path) {
            self.read_text(path).map(Some)
        } else {
            Ok(None)
        }
    }
}

/// Storage backed by the local filesystem with atomic writes.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }
}

impl Storage for LocalStorage {
    fn read_text(&self, path: &NormalizedPath) -> Result<String> {
        io::read_text(path)
    }

    fn write_text(&self, path: &NormalizedPath, content: &str) -> Result<()> {
        io::write_text(path, content)
    }

    fn exists(&self, path: &NormalizedPath) -> bool {
        path.to_native().is_file()
    }
}

/// In-memory storage, mainly for tests and previews.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: Mutex<BTreeMap<NormalizedPath, String>>,
    writes: Mutex<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file, builder style.
    pub fn with_file(self, path: impl Into<NormalizedPath>, content: impl Into<String>) -> Self {
        self.files().insert(path.into(), content.into());
        self
    }

    /// Current content of a file.
    pub fn get(&self, path: &NormalizedPath) -> Option<String> {
        self.files().get(path).cloned()
    }

    /// All stored paths in sorted order.
    pub fn paths(&self) -> Vec<NormalizedPath> {
        self.files().keys().cloned().collect()
    }

    /// Number of `write_text` calls performed so far.
    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn files(&self) -> MutexGuard<'_, BTreeMap<NormalizedPath, String>> {
        self.files.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Storage for MemoryStorage {
    fn read_text(&self, path: &NormalizedPath) -> Result<String> {
        self.files().get(path).cloned().ok_or_else(|| Error::NotFound {
            path: path.to_native(),
        })
    }

    fn write_text(&self, path: &NormalizedPath, content: &str) -> Result<()> {
        self.files().insert(path.clone(), content.to_string());
        *self.writes.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(())
    }

    fn exists(&self, path: &NormalizedPath) -> bool {
        self.files().contains_key(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        let path = NormalizedPath::new("/etc/nixforge/home.nix");

        assert!(!storage.exists(&path));
        storage.write_text(&path, "{ }").unwrap();
        assert!(storage.exists(&path));
        assert_eq!(storage.read_text(&path).unwrap(), "{ }");
        assert_eq!(storage.write_count(), 1);
    }

    #[test]
    fn test_memory_storage_missing_file_is_not_found() {
        let storage = MemoryStorage::new();
        let result = storage.read_text(&NormalizedPath::new("missing.nix"));
        assert!(matches!(result, Err(Error::NotFound { .. })));
    }

    #[test]
    fn test_read_optional() {
        let storage = MemoryStorage::new().with_file("a.nix", "x");
        assert_eq!(
            storage.read_optional(&NormalizedPath::new("a.nix")).unwrap(),
            Some("x".to_string())
        );
        assert_eq!(
            storage.read_optional(&NormalizedPath::new("b.nix")).unwrap(),
            None
        );
    }
}
