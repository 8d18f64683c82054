//! store::refs
//!
//! Named references: direct pointers to object ids, or symbolic pointers to
//! other references.
//!
//! # On-disk format
//!
//! One reference per file, path = reference name relative to the control
//! directory. The file holds either an oid string or the marker
//! `ref: <other-ref-name>`, whitespace-trimmed.
//!
//! # Resolution
//!
//! Symbolic refs dereference one level per hop; `resolve` with `deref` set
//! follows the chain to the final direct value. An absent ref resolves to
//! [`RefValue::Unset`] rather than an error - "no HEAD yet" and "no merge in
//! progress" are normal outcomes. Chain following carries a visited set so a
//! symbolic cycle fails with [`RefError::CycleDetected`] instead of looping.
//!
//! `update` and `delete` follow the same chain to find the storage location;
//! this is how committing through a symbolic `HEAD` advances the underlying
//! branch file rather than overwriting `HEAD` itself.

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::types::{Oid, RefName};

const SYMBOLIC_MARKER: &str = "ref:";

/// Errors from reference store operations.
#[derive(Debug, Error)]
pub enum RefError {
    /// The reference (or the ref its chain ends at) does not exist.
    #[error("ref not found: {name}")]
    NotFound { name: String },

    /// A stored or supplied ref value is not usable.
    #[error("invalid ref value: {0}")]
    InvalidValue(String),

    /// A symbolic chain revisited a reference.
    #[error("symbolic ref cycle detected at: {name}")]
    CycleDetected { name: String },

    #[error("ref store I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

/// The value of a reference.
///
/// Modeled as a tagged union so "symbolic with no target" cannot be
/// represented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefValue {
    /// A direct pointer to an object id.
    Direct(Oid),
    /// A symbolic pointer to another reference name.
    Symbolic(RefName),
    /// The reference is absent or empty.
    Unset,
}

impl RefValue {
    /// The object id, if this is a direct value.
    pub fn oid(&self) -> Option<&Oid> {
        match self {
            RefValue::Direct(oid) => Some(oid),
            _ => None,
        }
    }

    /// Whether the reference is absent.
    pub fn is_unset(&self) -> bool {
        matches!(self, RefValue::Unset)
    }
}

/// Named pointers, symbolic or direct, to object ids.
#[derive(Debug, Clone)]
pub struct RefStore {
    root: PathBuf,
}

impl RefStore {
    /// Create a ref store rooted at the control directory.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn ref_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Write a reference.
    ///
    /// When `deref` is set, the symbolic chain starting at `name` is followed
    /// and the final storage location is written; otherwise `name` itself is.
    /// Writes go through a temp file and rename to avoid truncated refs.
    ///
    /// # Errors
    ///
    /// `InvalidValue` if `value` is [`RefValue::Unset`]; use [`Self::delete`]
    /// to remove a reference.
    pub fn update(&self, name: &str, value: &RefValue, deref: bool) -> Result<(), RefError> {
        let text = match value {
            RefValue::Direct(oid) => oid.to_string(),
            RefValue::Symbolic(target) => format!("{SYMBOLIC_MARKER} {target}"),
            RefValue::Unset => {
                return Err(RefError::InvalidValue(
                    "cannot write an unset ref value".into(),
                ));
            }
        };

        let (location, _) = self.follow(name, deref)?;
        let path = self.ref_path(&location);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        write_atomic(&path, text.as_bytes())?;
        Ok(())
    }

    /// Resolve a reference.
    ///
    /// With `deref` set, follows the symbolic chain to the final value; the
    /// result is then either [`RefValue::Direct`] or [`RefValue::Unset`].
    /// Without it, returns the first hop's raw form, so `HEAD` can be
    /// inspected as "pointing at a branch name" without following it.
    pub fn resolve(&self, name: &str, deref: bool) -> Result<RefValue, RefError> {
        self.follow(name, deref).map(|(_, value)| value)
    }

    /// Delete a reference.
    ///
    /// Follows the same chain rule as [`Self::resolve`] to find the storage
    /// location, then removes that record.
    ///
    /// # Errors
    ///
    /// `NotFound` if the reference is absent.
    pub fn delete(&self, name: &str, deref: bool) -> Result<(), RefError> {
        let (location, value) = self.follow(name, deref)?;
        if value.is_unset() {
            return Err(RefError::NotFound {
                name: name.to_string(),
            });
        }
        fs::remove_file(self.ref_path(&location))?;
        Ok(())
    }

    /// Enumerate references whose name starts with `prefix`.
    ///
    /// Yields the fixed entries `HEAD` and `MERGE_HEAD` plus every leaf under
    /// `refs/`, each resolved with `deref` set, omitting absent entries.
    /// Ordering is deterministic for a given on-disk state.
    pub fn iter(&self, prefix: &str) -> Result<Vec<(String, RefValue)>, RefError> {
        let mut names = vec!["HEAD".to_string(), "MERGE_HEAD".to_string()];
        let refs_dir = self.root.join("refs");
        if refs_dir.is_dir() {
            collect_leaves(&refs_dir, "refs", &mut names)?;
        }

        let mut out = Vec::new();
        for name in names {
            if !name.starts_with(prefix) {
                continue;
            }
            let value = self.resolve(&name, true)?;
            if !value.is_unset() {
                out.push((name, value));
            }
        }
        Ok(out)
    }

    /// Follow the symbolic chain starting at `name`.
    ///
    /// Returns the storage location the chain ends at and its value. With
    /// `deref` unset, stops after the first hop.
    fn follow(&self, name: &str, deref: bool) -> Result<(String, RefValue), RefError> {
        let mut seen = HashSet::new();
        let mut current = name.to_string();
        loop {
            if !seen.insert(current.clone()) {
                return Err(RefError::CycleDetected { name: current });
            }

            let raw = match fs::read_to_string(self.ref_path(&current)) {
                Ok(raw) => raw.trim().to_string(),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                    return Ok((current, RefValue::Unset));
                }
                Err(err) => return Err(err.into()),
            };

            if raw.is_empty() {
                return Ok((current, RefValue::Unset));
            }

            if let Some(target) = raw.strip_prefix(SYMBOLIC_MARKER) {
                let target = target.trim();
                let target_name = RefName::new(target).map_err(|err| {
                    RefError::InvalidValue(format!("symbolic target in '{current}': {err}"))
                })?;
                if !deref {
                    return Ok((current, RefValue::Symbolic(target_name)));
                }
                current = target.to_string();
                continue;
            }

            let oid = Oid::new(&raw).map_err(|err| {
                RefError::InvalidValue(format!("stored value of '{current}': {err}"))
            })?;
            return Ok((current, RefValue::Direct(oid)));
        }
    }
}

/// Write a file through a temp file and rename in the same directory.
fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(path).map_err(|err| err.error)?;
    Ok(())
}

/// Recursively collect ref leaf names under `dir`, sorted per directory.
fn collect_leaves(dir: &Path, base: &str, out: &mut Vec<String>) -> std::io::Result<()> {
    let mut entries: Vec<_> = fs::read_dir(dir)?.collect::<Result<_, _>>()?;
    entries.sort_by_key(|entry| entry.file_name());
    for entry in entries {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        let child = format!("{base}/{name}");
        if entry.file_type()?.is_dir() {
            collect_leaves(&entry.path(), &child, out)?;
        } else {
            out.push(child);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct RefFixture {
        _dir: TempDir,
        refs: RefStore,
    }

    fn fixture() -> RefFixture {
        let dir = TempDir::new().unwrap();
        let refs = RefStore::new(dir.path().to_path_buf());
        RefFixture { _dir: dir, refs }
    }

    fn oid(byte: u8) -> Oid {
        Oid::new(format!("{:02x}", byte).repeat(20)).unwrap()
    }

    #[test]
    fn direct_ref_roundtrip() {
        let f = fixture();
        f.refs
            .update("refs/heads/main", &RefValue::Direct(oid(1)), true)
            .unwrap();
        assert_eq!(
            f.refs.resolve("refs/heads/main", true).unwrap(),
            RefValue::Direct(oid(1))
        );
    }

    #[test]
    fn absent_ref_is_unset_not_error() {
        let f = fixture();
        assert_eq!(f.refs.resolve("HEAD", true).unwrap(), RefValue::Unset);
        assert_eq!(f.refs.resolve("HEAD", false).unwrap(), RefValue::Unset);
    }

    #[test]
    fn symbolic_chain_resolution() {
        let f = fixture();
        let main = RefName::new("refs/heads/main").unwrap();
        f.refs
            .update("HEAD", &RefValue::Symbolic(main.clone()), false)
            .unwrap();
        f.refs
            .update("refs/heads/main", &RefValue::Direct(oid(2)), true)
            .unwrap();

        // deref=true follows to the direct value
        assert_eq!(
            f.refs.resolve("HEAD", true).unwrap(),
            RefValue::Direct(oid(2))
        );
        // deref=false reports the first hop's raw symbolic target
        assert_eq!(
            f.refs.resolve("HEAD", false).unwrap(),
            RefValue::Symbolic(main)
        );
    }

    #[test]
    fn update_through_symbolic_head_writes_branch() {
        let f = fixture();
        f.refs
            .update(
                "HEAD",
                &RefValue::Symbolic(RefName::new("refs/heads/main").unwrap()),
                false,
            )
            .unwrap();

        // Writing HEAD with deref lands on the branch file.
        f.refs
            .update("HEAD", &RefValue::Direct(oid(3)), true)
            .unwrap();
        assert_eq!(
            f.refs.resolve("refs/heads/main", true).unwrap(),
            RefValue::Direct(oid(3))
        );
        // HEAD itself is still symbolic.
        assert!(matches!(
            f.refs.resolve("HEAD", false).unwrap(),
            RefValue::Symbolic(_)
        ));
    }

    #[test]
    fn symbolic_may_point_at_unborn_branch() {
        let f = fixture();
        f.refs
            .update(
                "HEAD",
                &RefValue::Symbolic(RefName::new("refs/heads/unborn").unwrap()),
                false,
            )
            .unwrap();
        assert_eq!(f.refs.resolve("HEAD", true).unwrap(), RefValue::Unset);
    }

    #[test]
    fn cycle_detected() {
        let f = fixture();
        f.refs
            .update(
                "refs/heads/a",
                &RefValue::Symbolic(RefName::new("refs/heads/b").unwrap()),
                false,
            )
            .unwrap();
        f.refs
            .update(
                "refs/heads/b",
                &RefValue::Symbolic(RefName::new("refs/heads/a").unwrap()),
                false,
            )
            .unwrap();
        assert!(matches!(
            f.refs.resolve("refs/heads/a", true),
            Err(RefError::CycleDetected { .. })
        ));
    }

    #[test]
    fn unset_value_rejected_on_update() {
        let f = fixture();
        assert!(matches!(
            f.refs.update("refs/heads/main", &RefValue::Unset, true),
            Err(RefError::InvalidValue(_))
        ));
    }

    #[test]
    fn delete_direct() {
        let f = fixture();
        f.refs
            .update("refs/tags/v1", &RefValue::Direct(oid(4)), true)
            .unwrap();
        f.refs.delete("refs/tags/v1", true).unwrap();
        assert_eq!(
            f.refs.resolve("refs/tags/v1", true).unwrap(),
            RefValue::Unset
        );
    }

    #[test]
    fn delete_absent_fails() {
        let f = fixture();
        assert!(matches!(
            f.refs.delete("refs/tags/nope", true),
            Err(RefError::NotFound { .. })
        ));
    }

    #[test]
    fn delete_without_deref_removes_the_name_itself() {
        let f = fixture();
        let main = RefName::new("refs/heads/main").unwrap();
        f.refs
            .update("MERGE_HEAD", &RefValue::Symbolic(main), false)
            .unwrap();
        f.refs.delete("MERGE_HEAD", false).unwrap();
        assert_eq!(
            f.refs.resolve("MERGE_HEAD", false).unwrap(),
            RefValue::Unset
        );
    }

    #[test]
    fn iter_lists_head_and_leaves_omitting_unset() {
        let f = fixture();
        f.refs
            .update(
                "HEAD",
                &RefValue::Symbolic(RefName::new("refs/heads/main").unwrap()),
                false,
            )
            .unwrap();
        f.refs
            .update("refs/heads/main", &RefValue::Direct(oid(5)), true)
            .unwrap();
        f.refs
            .update("refs/tags/v1", &RefValue::Direct(oid(6)), true)
            .unwrap();

        let all = f.refs.iter("").unwrap();
        let names: Vec<_> = all.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["HEAD", "refs/heads/main", "refs/tags/v1"]);
        // HEAD resolves through the chain; MERGE_HEAD is absent and omitted.
        assert_eq!(all[0].1, RefValue::Direct(oid(5)));
    }

    #[test]
    fn iter_filters_by_prefix() {
        let f = fixture();
        f.refs
            .update("refs/heads/main", &RefValue::Direct(oid(7)), true)
            .unwrap();
        f.refs
            .update("refs/tags/v1", &RefValue::Direct(oid(8)), true)
            .unwrap();

        let heads = f.refs.iter("refs/heads/").unwrap();
        assert_eq!(heads.len(), 1);
        assert_eq!(heads[0].0, "refs/heads/main");
    }

    #[test]
    fn iter_is_deterministic() {
        let f = fixture();
        for name in ["zeta", "alpha", "mid"] {
            f.refs
                .update(
                    &format!("refs/heads/{name}"),
                    &RefValue::Direct(oid(9)),
                    true,
                )
                .unwrap();
        }
        let first: Vec<_> = f.refs.iter("").unwrap().into_iter().map(|r| r.0).collect();
        let second: Vec<_> = f.refs.iter("").unwrap().into_iter().map(|r| r.0).collect();
        assert_eq!(first, second);
        assert_eq!(
            first,
            vec!["refs/heads/alpha", "refs/heads/mid", "refs/heads/zeta"]
        );
    }
}
