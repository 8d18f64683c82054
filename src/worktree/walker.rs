//! worktree::walker
//!
//! Directory traversal and the excluded-path predicate.
//!
//! A path is excluded if any forward-slash-normalized segment equals one of
//! a fixed reserved set: the repository's own control directory plus common
//! environment and build artifact directories. Every directory walk and
//! staging operation consults this predicate.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::paths::CONTROL_DIR;

/// Reserved path segments that no walk descends into.
pub const EXCLUDED_SEGMENTS: &[&str] = &[
    CONTROL_DIR,
    ".git",
    ".idea",
    "__pycache__",
    "node_modules",
    "target",
    "venv",
];

/// Whether any segment of `path` is reserved.
pub fn is_excluded(path: &Path) -> bool {
    path.components().any(|component| {
        component
            .as_os_str()
            .to_str()
            .is_some_and(|segment| EXCLUDED_SEGMENTS.contains(&segment))
    })
}

/// Recursively walk `root`, yielding `(path, is_file)` pairs in sorted
/// order per directory, pruning excluded segments. Directories are yielded
/// before their contents. Entries that are neither regular files nor
/// directories (symlinks, sockets) are skipped.
pub fn walk(root: &Path) -> std::io::Result<Vec<(PathBuf, bool)>> {
    let mut out = Vec::new();
    walk_into(root, &mut out)?;
    Ok(out)
}

fn walk_into(dir: &Path, out: &mut Vec<(PathBuf, bool)>) -> std::io::Result<()> {
    let mut entries: Vec<_> = fs::read_dir(dir)?.collect::<Result<_, _>>()?;
    entries.sort_by_key(|entry| entry.file_name());
    for entry in entries {
        // Segment-level check: the walk root itself may be an absolute path
        // whose ancestors are not repo-relative segments.
        let name = entry.file_name();
        if name
            .to_str()
            .is_some_and(|segment| EXCLUDED_SEGMENTS.contains(&segment))
        {
            continue;
        }
        let path = entry.path();
        let file_type = entry.file_type()?;
        if file_type.is_file() {
            out.push((path, true));
        } else if file_type.is_dir() {
            out.push((path.clone(), false));
            walk_into(&path, out)?;
        }
    }
    Ok(())
}
