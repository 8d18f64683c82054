//! core::paths
//!
//! Centralized path routing for Vellum storage locations.
//!
//! All repository storage lives under `<work_dir>/.vellum/`:
//! - `objects/` - content-addressed object records
//! - `index` - staging index (JSON)
//! - `config.toml` - repository configuration
//! - `HEAD`, `MERGE_HEAD`, `refs/` - reference files
//!
//! No code outside this module should compute `*.join(".vellum")` paths.
//!
//! # Example
//!
//! ```
//! use vellum::core::paths::RepoPaths;
//! use std::path::PathBuf;
//!
//! let paths = RepoPaths::new(PathBuf::from("/repo"));
//! assert_eq!(paths.objects_dir(), PathBuf::from("/repo/.vellum/objects"));
//! ```

use std::path::{Path, PathBuf};

/// Name of the repository control directory.
pub const CONTROL_DIR: &str = ".vellum";

/// Centralized path routing for a repository's storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoPaths {
    work_dir: PathBuf,
}

impl RepoPaths {
    /// Create paths rooted at a working directory.
    pub fn new(work_dir: PathBuf) -> Self {
        Self { work_dir }
    }

    /// Walk upward from `start` looking for a directory that contains the
    /// control directory. Returns `None` if no repository is found.
    pub fn discover(start: &Path) -> Option<Self> {
        let mut dir = start;
        loop {
            if dir.join(CONTROL_DIR).is_dir() {
                return Some(Self::new(dir.to_path_buf()));
            }
            dir = dir.parent()?;
        }
    }

    /// The working directory (repository root).
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// The control directory (`<work_dir>/.vellum`).
    pub fn control_dir(&self) -> PathBuf {
        self.work_dir.join(CONTROL_DIR)
    }

    /// The object store directory.
    pub fn objects_dir(&self) -> PathBuf {
        self.control_dir().join("objects")
    }

    /// The staging index file.
    pub fn index_path(&self) -> PathBuf {
        self.control_dir().join("index")
    }

    /// The repository configuration file.
    pub fn config_path(&self) -> PathBuf {
        self.control_dir().join("config.toml")
    }
}
