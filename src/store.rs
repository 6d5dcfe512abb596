use std::io::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde_json::Value;

use crate::error::DocumentError;

/// Single-file home of the most recently fetched catalog.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub path: PathBuf,
    /// File contents exactly as persisted.
    pub raw: String,
    pub value: Value,
    pub size_bytes: u64,
    pub modified: Option<DateTime<Local>>,
}

impl DocumentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Replaces the document with `bytes`.
    ///
    /// The bytes land in a temp file next to the target which is then renamed
    /// over it, so readers observe either the previous or the new document.
    pub fn write_raw(&self, bytes: &[u8]) -> std::io::Result<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&parent)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|err| err.error)?;

        Ok(())
    }

    pub fn load(&self) -> Result<LoadedDocument, DocumentError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(DocumentError::NotFound {
                    path: self.path.clone(),
                });
            }
            Err(source) => {
                return Err(DocumentError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let value: Value =
            serde_json::from_slice(&bytes).map_err(|source| DocumentError::Parse {
                path: self.path.clone(),
                source,
            })?;

        let metadata = std::fs::metadata(&self.path).map_err(|source| DocumentError::Io {
            path: self.path.clone(),
            source,
        })?;
        let modified = metadata.modified().ok().map(DateTime::<Local>::from);

        Ok(LoadedDocument {
            path: self.path.clone(),
            raw: String::from_utf8_lossy(&bytes).into_owned(),
            value,
            size_bytes: metadata.len(),
            modified,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_reports_missing_document_as_not_found() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        let store = DocumentStore::new(temp.path().join("catalog.json"));

        assert!(!store.exists());
        let err = store.load().unwrap_err();
        assert!(matches!(err, DocumentError::NotFound { .. }));

        Ok(())
    }

    #[test]
    fn load_reports_malformed_document_as_parse_error() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        let store = DocumentStore::new(temp.path().join("catalog.json"));
        store.write_raw(b"{\"Categories\": [")?;

        let err = store.load().unwrap_err();
        assert!(matches!(err, DocumentError::Parse { .. }));

        Ok(())
    }

    #[test]
    fn write_raw_overwrites_wholesale_and_keeps_bytes_verbatim() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        let store = DocumentStore::new(temp.path().join("nested").join("catalog.json"));

        store.write_raw(b"{\"Categories\": [], \"Old\": true}")?;
        let fresh = b"{ \"Categories\" : [ ] }";
        store.write_raw(fresh)?;

        let loaded = store.load()?;
        assert_eq!(loaded.raw.as_bytes(), fresh);
        assert_eq!(loaded.size_bytes, fresh.len() as u64);
        assert!(loaded.value.get("Old").is_none());
        assert!(loaded.modified.is_some());

        let leftovers = std::fs::read_dir(temp.path().join("nested"))?.count();
        assert_eq!(leftovers, 1);

        Ok(())
    }
}
