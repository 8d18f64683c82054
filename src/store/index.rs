//! store::index
//!
//! The staging index: a mapping from repo-relative path to blob id,
//! persisted as JSON.
//!
//! # Persistence discipline
//!
//! The index is a single shared mutable resource per repository. [`Index`]
//! is a guard over one read-modify-write sequence: mutations mark it dirty
//! and `Drop` flushes pending changes, so entries staged before a mid-walk
//! failure are not silently lost. Callers on the happy path should still
//! call [`Index::flush`] so write errors surface instead of being swallowed
//! by `Drop`. Partial staging within one call is not rolled back.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::types::Oid;

/// Errors from staging index operations.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("index I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("malformed index file: {0}")]
    Malformed(String),
}

/// A scoped handle on the staging index.
#[derive(Debug)]
pub struct Index {
    path: PathBuf,
    entries: BTreeMap<String, Oid>,
    dirty: bool,
}

impl Index {
    /// Load the index from its file. A missing file yields an empty index.
    pub fn open(path: PathBuf) -> Result<Self, IndexError> {
        let entries = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)
                .map_err(|err| IndexError::Malformed(err.to_string()))?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self {
            path,
            entries,
            dirty: false,
        })
    }

    /// Record a path as staged at a blob id.
    pub fn set(&mut self, path: String, oid: Oid) {
        self.entries.insert(path, oid);
        self.dirty = true;
    }

    /// Look up the staged blob id for a path.
    pub fn get(&self, path: &str) -> Option<&Oid> {
        self.entries.get(path)
    }

    /// The full path-to-blob mapping, in sorted path order.
    pub fn entries(&self) -> &BTreeMap<String, Oid> {
        &self.entries
    }

    /// Whether nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace the whole mapping.
    ///
    /// Checkout and merge use this to make the staged state mirror the tree
    /// they just materialized.
    pub fn replace(&mut self, entries: BTreeMap<String, Oid>) {
        self.entries = entries;
        self.dirty = true;
    }

    /// Write the index back to its file (temp file then rename).
    pub fn flush(&mut self) -> Result<(), IndexError> {
        let text = serde_json::to_string_pretty(&self.entries)
            .map_err(|err| IndexError::Malformed(err.to_string()))?;
        let dir = self
            .path
            .parent()
            .ok_or_else(|| IndexError::Malformed("index path has no parent".into()))?;
        let tmp = tempfile::NamedTempFile::new_in(dir)?;
        fs::write(tmp.path(), text)?;
        tmp.persist(&self.path).map_err(|err| err.error)?;
        self.dirty = false;
        Ok(())
    }
}

impl Drop for Index {
    fn drop(&mut self) {
        if self.dirty {
            // Last-chance persistence on error exit paths; failures here
            // have no channel to report through.
            let _ = self.flush();
        }
    }
}
