//! merge
//!
//! Tree-level alignment, diffing, and three-way merge.
//!
//! The orchestration here works on flattened trees (path-to-blob maps).
//! Blob-level merging is delegated to the external engine in [`engine`];
//! this module persists whatever bytes come back and never interprets
//! conflict markers.

pub mod engine;

use std::collections::BTreeMap;

use thiserror::Error;

use crate::codec::tree::TreeMap;
use crate::codec::CodecError;
use crate::core::types::{ObjectType, Oid};
use crate::store::objects::ObjectError;
use crate::store::ObjectStore;
use engine::EngineError;

/// Errors from merge orchestration.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Object(#[from] ObjectError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Full outer join of N trees keyed by path.
///
/// Yields the union of all paths in sorted order; each row holds the blob
/// id from each input tree, or `None` where that tree lacks the path. A
/// path absent from every input never appears.
pub fn align(trees: &[&TreeMap]) -> Vec<(String, Vec<Option<Oid>>)> {
    let mut rows: BTreeMap<String, Vec<Option<Oid>>> = BTreeMap::new();
    for (position, tree) in trees.iter().enumerate() {
        for (path, oid) in tree.iter() {
            rows.entry(path.clone())
                .or_insert_with(|| vec![None; trees.len()])[position] = Some(oid.clone());
        }
    }
    rows.into_iter().collect()
}

/// How a path changed between two trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    NewFile,
    Deleted,
    Modified,
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            ChangeKind::NewFile => "new file",
            ChangeKind::Deleted => "deleted",
            ChangeKind::Modified => "modified",
        };
        write!(f, "{text}")
    }
}

/// Paths that differ between two trees, with their change kind.
///
/// Paths with identical blob ids in both trees are excluded entirely.
pub fn diff_trees(from: &TreeMap, to: &TreeMap) -> Vec<(String, ChangeKind)> {
    let mut changes = Vec::new();
    for (path, row) in align(&[from, to]) {
        let kind = match (&row[0], &row[1]) {
            (None, Some(_)) => ChangeKind::NewFile,
            (Some(_), None) => ChangeKind::Deleted,
            (Some(a), Some(b)) if a != b => ChangeKind::Modified,
            _ => continue,
        };
        changes.push((path, kind));
    }
    changes
}

/// The result of a three-way tree merge.
#[derive(Debug)]
pub struct MergedTree {
    /// Path-to-blob map of the merged content.
    pub map: TreeMap,
    /// Paths whose merged bytes carry engine conflict markers.
    pub conflicts: Vec<String>,
}

/// Three-way merge of flattened trees.
///
/// Every path in the union of the three trees is delegated to the external
/// line-merge engine with its (possibly absent) blob contents from each
/// side. The engine's output is stored as a new blob and included in the
/// merged map whether or not it carries conflict markers.
pub fn merge_trees(
    objects: &ObjectStore,
    program: &str,
    base: &TreeMap,
    head: &TreeMap,
    other: &TreeMap,
) -> Result<MergedTree, MergeError> {
    let mut map = TreeMap::new();
    let mut conflicts = Vec::new();

    for (path, row) in align(&[base, head, other]) {
        let base_blob = load(objects, &row[0])?;
        let head_blob = load(objects, &row[1])?;
        let other_blob = load(objects, &row[2])?;

        let (merged, conflicted) = engine::merge_blobs(
            program,
            base_blob.as_deref(),
            head_blob.as_deref(),
            other_blob.as_deref(),
        )?;
        let oid = objects.put(&merged, ObjectType::Blob)?;
        map.insert(path.clone(), oid);
        if conflicted {
            conflicts.push(path);
        }
    }

    Ok(MergedTree { map, conflicts })
}

/// Unified diff output between two flattened trees.
pub fn diff_output(
    objects: &ObjectStore,
    program: &str,
    from: &TreeMap,
    to: &TreeMap,
) -> Result<Vec<u8>, MergeError> {
    let mut out = Vec::new();
    for (path, row) in align(&[from, to]) {
        if row[0] == row[1] {
            continue;
        }
        let from_blob = load(objects, &row[0])?;
        let to_blob = load(objects, &row[1])?;
        out.extend(engine::diff_blobs(
            program,
            from_blob.as_deref(),
            to_blob.as_deref(),
            &path,
        )?);
    }
    Ok(out)
}

fn load(objects: &ObjectStore, oid: &Option<Oid>) -> Result<Option<Vec<u8>>, MergeError> {
    match oid {
        Some(oid) => Ok(Some(objects.get(oid, Some(ObjectType::Blob))?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn oid(byte: u8) -> Oid {
        Oid::new(format!("{:02x}", byte).repeat(20)).unwrap()
    }

    fn tree(pairs: &[(&str, u8)]) -> TreeMap {
        pairs
            .iter()
            .map(|(path, byte)| (path.to_string(), oid(*byte)))
            .collect()
    }

    mod align {
        use super::*;

        #[test]
        fn union_of_paths_with_absent_markers() {
            let a = tree(&[("shared", 1), ("only-a", 2)]);
            let b = tree(&[("shared", 1), ("only-b", 3)]);
            let rows = align(&[&a, &b]);
            assert_eq!(rows.len(), 3);
            assert_eq!(rows[0], ("only-a".into(), vec![Some(oid(2)), None]));
            assert_eq!(rows[1], ("only-b".into(), vec![None, Some(oid(3))]));
            assert_eq!(
                rows[2],
                ("shared".into(), vec![Some(oid(1)), Some(oid(1))])
            );
        }

        #[test]
        fn three_way_rows() {
            let base = tree(&[("f", 1)]);
            let head = tree(&[("f", 2)]);
            let other = tree(&[]);
            let rows = align(&[&base, &head, &other]);
            assert_eq!(rows, vec![("f".into(), vec![Some(oid(1)), Some(oid(2)), None])]);
        }

        #[test]
        fn empty_inputs_empty_output() {
            assert!(align(&[&TreeMap::new(), &TreeMap::new()]).is_empty());
        }
    }

    mod diff {
        use super::*;

        #[test]
        fn classifies_changes() {
            let from = tree(&[("kept", 1), ("gone", 2), ("edited", 3)]);
            let to = tree(&[("kept", 1), ("edited", 4), ("added", 5)]);
            let changes = diff_trees(&from, &to);
            assert_eq!(
                changes,
                vec![
                    ("added".to_string(), ChangeKind::NewFile),
                    ("edited".to_string(), ChangeKind::Modified),
                    ("gone".to_string(), ChangeKind::Deleted),
                ]
            );
        }

        #[test]
        fn identical_trees_diff_empty() {
            let a = tree(&[("x", 1)]);
            assert!(diff_trees(&a, &a.clone()).is_empty());
        }
    }

    mod three_way {
        use super::*;

        struct MergeFixture {
            _dir: TempDir,
            objects: ObjectStore,
        }

        fn fixture() -> MergeFixture {
            let dir = TempDir::new().unwrap();
            let objects = ObjectStore::new(dir.path().to_path_buf());
            MergeFixture { _dir: dir, objects }
        }

        impl MergeFixture {
            fn blob(&self, content: &str) -> Oid {
                self.objects
                    .put(content.as_bytes(), ObjectType::Blob)
                    .unwrap()
            }
        }

        #[test]
        fn disjoint_additions_merge_cleanly() {
            let f = fixture();
            let one = f.blob("1\n");
            let two = f.blob("2\n");
            let three = f.blob("3\n");

            let base: TreeMap = [("a.txt".to_string(), one.clone())].into();
            let head: TreeMap = [
                ("a.txt".to_string(), one.clone()),
                ("b.txt".to_string(), two.clone()),
            ]
            .into();
            let other: TreeMap = [
                ("a.txt".to_string(), one.clone()),
                ("c.txt".to_string(), three.clone()),
            ]
            .into();

            let merged = merge_trees(&f.objects, "diff3", &base, &head, &other).unwrap();
            assert!(merged.conflicts.is_empty());
            assert_eq!(merged.map.len(), 3);
            assert_eq!(merged.map.get("a.txt"), Some(&one));
            assert_eq!(merged.map.get("b.txt"), Some(&two));
            assert_eq!(merged.map.get("c.txt"), Some(&three));
        }

        #[test]
        fn conflicting_edits_surface_the_path() {
            let f = fixture();
            let base: TreeMap = [("f.txt".to_string(), f.blob("base\n"))].into();
            let head: TreeMap = [("f.txt".to_string(), f.blob("head\n"))].into();
            let other: TreeMap = [("f.txt".to_string(), f.blob("other\n"))].into();

            let merged = merge_trees(&f.objects, "diff3", &base, &head, &other).unwrap();
            assert_eq!(merged.conflicts, vec!["f.txt"]);
            assert!(merged.map.contains_key("f.txt"));
        }

        #[test]
        fn one_sided_edit_takes_that_side() {
            let f = fixture();
            let edited = f.blob("edited\n");
            let base: TreeMap = [("f.txt".to_string(), f.blob("orig\n"))].into();
            let head: TreeMap = [("f.txt".to_string(), edited.clone())].into();
            let other: TreeMap = [("f.txt".to_string(), f.blob("orig\n"))].into();

            let merged = merge_trees(&f.objects, "diff3", &base, &head, &other).unwrap();
            assert!(merged.conflicts.is_empty());
            assert_eq!(merged.map.get("f.txt"), Some(&edited));
        }
    }
}
