//! Per-user overlay storage for edited documents
//!
//! The analogue of the browser's localStorage: a single JSON file mapping
//! document id to edited content, scoped to this machine's user. An overlay
//! entry shadows the source content until it is removed. No expiry, no
//! cross-device sync.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use thiserror::Error;

/// Errors from the overlay store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access overlay store at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("overlay store at {path} is corrupt")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode overlay store")]
    Encode(#[source] serde_json::Error),
}

/// Key-value store of edited document content, persisted as one JSON file.
#[derive(Debug)]
pub struct OverlayStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl OverlayStore {
    /// Open the store, loading existing entries if the file is present.
    pub fn open(path: PathBuf) -> Result<Self, StoreError> {
        let entries = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(|e| StoreError::Io {
                path: path.clone(),
                source: e,
            })?;
            serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt {
                path: path.clone(),
                source: e,
            })?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, entries })
    }

    /// Saved content for a document, if any.
    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    /// Save edited content for a document and persist immediately.
    pub fn put(&mut self, id: &str, content: &str) -> Result<(), StoreError> {
        self.entries.insert(id.to_string(), content.to_string());
        self.persist()?;
        tracing::debug!("saved overlay for {id}");
        Ok(())
    }

    /// Drop the saved content for a document. Returns whether an entry was
    /// actually removed.
    pub fn remove(&mut self, id: &str) -> Result<bool, StoreError> {
        let removed = self.entries.remove(id).is_some();
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }

    fn persist(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::Io {
                path: self.path.clone(),
                source: e,
            })?;
        }
        let raw = serde_json::to_string_pretty(&self.entries).map_err(StoreError::Encode)?;
        fs::write(&self.path, raw).map_err(|e| StoreError::Io {
            path: self.path.clone(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overlays.json");

        let mut store = OverlayStore::open(path.clone()).unwrap();
        store.put("doc", "# Edited").unwrap();
        drop(store);

        let store = OverlayStore::open(path).unwrap();
        assert_eq!(store.get("doc"), Some("# Edited"));
    }

    #[test]
    fn test_remove() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overlays.json");

        let mut store = OverlayStore::open(path).unwrap();
        store.put("doc", "content").unwrap();
        assert!(store.remove("doc").unwrap());
        assert_eq!(store.get("doc"), None);
        assert!(!store.remove("doc").unwrap());
    }

    #[test]
    fn test_missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = OverlayStore::open(dir.path().join("none.json")).unwrap();
        assert_eq!(store.get("anything"), None);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overlays.json");
        fs::write(&path, "not json").unwrap();

        let err = OverlayStore::open(path).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[test]
    fn test_store_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deep").join("overlays.json");

        let mut store = OverlayStore::open(path.clone()).unwrap();
        store.put("doc", "x").unwrap();
        assert!(path.exists());
    }
}
