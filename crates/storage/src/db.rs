//! JSON file wrapper with serialization helpers.

use powchain_core::canonical::{to_document, EncodingError};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    #[error("File not found: {0}")]
    NotFound(PathBuf),
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A JSON document on disk.
///
/// The file is only held open for the duration of a single read or write.
/// Writes go to a temporary sibling that is renamed over the target, so an
/// interrupted write leaves the previous document intact.
#[derive(Debug, Clone)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    /// Open a document at the given path. The file need not exist yet.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the file exists.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Retrieve and deserialize the document.
    pub fn get<V>(&self) -> Result<Option<V>>
    where
        V: serde::de::DeserializeOwned,
    {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let value = serde_json::from_reader(BufReader::new(file))?;
        Ok(Some(value))
    }

    /// Retrieve the document, returning error if not found.
    pub fn get_or_err<V>(&self) -> Result<V>
    where
        V: serde::de::DeserializeOwned,
    {
        self.get()?
            .ok_or_else(|| StorageError::NotFound(self.path.clone()))
    }

    /// Serialize and store the document, replacing any previous content.
    pub fn put<V>(&self, value: &V) -> Result<()>
    where
        V: serde::Serialize + ?Sized,
    {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            to_document(&mut writer, value)?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Doc {
        name: String,
        value: f64,
    }

    fn setup() -> (TempDir, Storage) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::open(dir.path().join("doc.json"));
        (dir, storage)
    }

    #[test]
    fn test_put_get() {
        let (_dir, storage) = setup();

        let doc = Doc {
            name: "ledger".into(),
            value: 0.5,
        };
        storage.put(&doc).unwrap();

        let back: Option<Doc> = storage.get().unwrap();
        assert_eq!(back, Some(doc));
    }

    #[test]
    fn test_missing_file() {
        let (_dir, storage) = setup();

        assert!(!storage.exists());
        let missing: Option<Doc> = storage.get().unwrap();
        assert_eq!(missing, None);

        let result: Result<Doc> = storage.get_or_err();
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_put_replaces_content() {
        let (_dir, storage) = setup();

        storage.put(&vec![1u64, 2, 3]).unwrap();
        storage.put(&vec![4u64]).unwrap();

        let back: Vec<u64> = storage.get_or_err().unwrap();
        assert_eq!(back, vec![4]);
    }

    #[test]
    fn test_document_layout() {
        let (_dir, storage) = setup();

        storage.put(&vec![1.0f64]).unwrap();
        let text = std::fs::read_to_string(storage.path()).unwrap();
        assert_eq!(text, "[\n    1.0\n]");
    }

    #[test]
    fn test_malformed_json() {
        let (_dir, storage) = setup();

        std::fs::write(storage.path(), "[1, 2").unwrap();
        let result: Result<Option<Vec<u64>>> = storage.get();
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::open(dir.path().join("nope").join("doc.json"));

        let result = storage.put(&1u64);
        assert!(matches!(result, Err(StorageError::Io(_))));
    }
}
