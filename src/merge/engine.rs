//! merge::engine
//!
//! The external line-merge engine boundary.
//!
//! Blob contents are merged and diffed by external programs (`diff3` and
//! `diff` by default, configurable per repository). Invocation is a
//! synchronous pipe: write full input to temp files, block for full output
//! and exit status.
//!
//! # Exit-status contract
//!
//! For the three-way merge, exit 0 is a clean merge and exit 1 means
//! "merged with conflict markers embedded" - both are accepted outcomes and
//! the returned bytes are persisted either way. Any other status is a hard
//! failure. The unified diff follows the same convention (exit 1 simply
//! means "files differ").

use std::io::Write;
use std::process::Command;

use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors from external engine invocations.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to run '{program}': {source}")]
    Launch {
        program: String,
        source: std::io::Error,
    },

    #[error("'{program}' failed with status {status}")]
    Failed { program: String, status: String },

    #[error("engine I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

/// Write optional blob contents to a temp file, empty when absent.
fn blob_file(content: Option<&[u8]>) -> Result<NamedTempFile, EngineError> {
    let mut file = NamedTempFile::new()?;
    if let Some(bytes) = content {
        file.write_all(bytes)?;
        file.flush()?;
    }
    Ok(file)
}

/// Three-way merge of optional blob contents.
///
/// Returns the merged bytes and whether the engine embedded conflict
/// markers. The marker convention is the engine's own; callers persist the
/// bytes without interpreting them.
pub fn merge_blobs(
    program: &str,
    base: Option<&[u8]>,
    ours: Option<&[u8]>,
    theirs: Option<&[u8]>,
) -> Result<(Vec<u8>, bool), EngineError> {
    let base_file = blob_file(base)?;
    let ours_file = blob_file(ours)?;
    let theirs_file = blob_file(theirs)?;

    let output = Command::new(program)
        .arg("-m")
        .args(["-L", "HEAD", "-L", "base", "-L", "incoming"])
        .arg(ours_file.path())
        .arg(base_file.path())
        .arg(theirs_file.path())
        .output()
        .map_err(|source| EngineError::Launch {
            program: program.to_string(),
            source,
        })?;

    match output.status.code() {
        Some(0) => Ok((output.stdout, false)),
        Some(1) => Ok((output.stdout, true)),
        _ => Err(EngineError::Failed {
            program: program.to_string(),
            status: output.status.to_string(),
        }),
    }
}

/// Unified diff of optional blob contents, labeled with the repo path.
pub fn diff_blobs(
    program: &str,
    from: Option<&[u8]>,
    to: Option<&[u8]>,
    path: &str,
) -> Result<Vec<u8>, EngineError> {
    let from_file = blob_file(from)?;
    let to_file = blob_file(to)?;

    let output = Command::new(program)
        .arg("--unified")
        .args(["--label", &format!("a/{path}"), "--label", &format!("b/{path}")])
        .arg(from_file.path())
        .arg(to_file.path())
        .output()
        .map_err(|source| EngineError::Launch {
            program: program.to_string(),
            source,
        })?;

    match output.status.code() {
        // 0: identical, 1: differ - both are answers, not failures.
        Some(0) | Some(1) => Ok(output.stdout),
        _ => Err(EngineError::Failed {
            program: program.to_string(),
            status: output.status.to_string(),
        }),
    }
}
