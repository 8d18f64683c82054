//! core::config
//!
//! Repository configuration schema and loading.
//!
//! Stored at `.vellum/config.toml`, written by `init`. A missing file is not
//! an error; defaults are used.
//!
//! # Example
//!
//! ```toml
//! default_branch = "main"
//! merge_tool = "diff3"
//! diff_tool = "diff"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Repository configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct RepoConfig {
    /// Branch that `HEAD` points at after `init`.
    pub default_branch: String,

    /// External three-way line-merge program.
    pub merge_tool: String,

    /// External unified-diff program.
    pub diff_tool: String,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            default_branch: "main".into(),
            merge_tool: "diff3".into(),
            diff_tool: "diff".into(),
        }
    }
}

impl RepoConfig {
    /// Load configuration from a file.
    ///
    /// A missing file yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(ConfigError::ReadError {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };
        toml::from_str(&text).map_err(|err| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    /// Write configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let text = toml::to_string_pretty(self).map_err(|err| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        fs::write(path, text).map_err(|err| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: err,
        })
    }
}
