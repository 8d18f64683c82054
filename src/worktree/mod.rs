//! worktree
//!
//! Working-tree materialization: snapshotting a directory (or the staging
//! index) into tree objects, and writing a stored tree back out to disk.
//!
//! # Canonical snapshots
//!
//! Both snapshot modes - walking the directory and folding the flat index -
//! end at [`crate::codec::tree::encode_tree`], whose sorted output makes
//! the encodings byte-identical for the same logical content.

pub mod walker;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::codec::tree::{encode_tree, TreeEntry, TreeMap};
use crate::codec::{read_tree, CodecError};
use crate::core::paths::RepoPaths;
use crate::core::types::{ObjectType, Oid};
use crate::store::objects::ObjectError;
use crate::store::{Index, ObjectStore};
use crate::store::index::IndexError;
use walker::{is_excluded, walk};

/// Errors from working-tree operations.
#[derive(Debug, Error)]
pub enum WorktreeError {
    /// A path handed to `stage` does not exist under the work root.
    #[error("path not found in working tree: {path}")]
    PathNotFound { path: PathBuf },

    /// A path handed to `stage` escapes the work root.
    #[error("path is outside the working tree: {path}")]
    OutsideWorkTree { path: PathBuf },

    #[error("working tree I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error(transparent)]
    Object(#[from] ObjectError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Snapshot-to-tree and tree-to-filesystem operations.
#[derive(Debug, Clone)]
pub struct Materializer<'a> {
    paths: &'a RepoPaths,
    objects: &'a ObjectStore,
}

impl<'a> Materializer<'a> {
    pub fn new(paths: &'a RepoPaths, objects: &'a ObjectStore) -> Self {
        Self { paths, objects }
    }

    /// Snapshot the working directory into a stored tree, bottom-up.
    ///
    /// Files are hashed into blobs; subdirectories become nested tree
    /// objects. Excluded segments are skipped.
    pub fn snapshot_worktree(&self) -> Result<Oid, WorktreeError> {
        self.snapshot_dir(self.paths.work_dir())
    }

    fn snapshot_dir(&self, dir: &Path) -> Result<Oid, WorktreeError> {
        let mut entries = Vec::new();
        let mut listing: Vec<_> = fs::read_dir(dir)?.collect::<Result<_, _>>()?;
        listing.sort_by_key(|entry| entry.file_name());
        for item in listing {
            let name = item.file_name();
            let Some(name) = name.to_str() else { continue };
            if walker::EXCLUDED_SEGMENTS.contains(&name) {
                continue;
            }
            let file_type = item.file_type()?;
            if file_type.is_file() {
                let payload = fs::read(item.path())?;
                let oid = self.objects.put(&payload, ObjectType::Blob)?;
                entries.push(TreeEntry::new(name, oid, ObjectType::Blob));
            } else if file_type.is_dir() {
                let oid = self.snapshot_dir(&item.path())?;
                entries.push(TreeEntry::new(name, oid, ObjectType::Tree));
            }
        }
        Ok(self.objects.put(&encode_tree(&entries), ObjectType::Tree)?)
    }

    /// Fold a flat path-to-blob map into nested tree objects, bottom-up.
    ///
    /// This is the commit path: the staging index is folded into the same
    /// canonical encoding a directory walk would produce.
    pub fn snapshot_map(&self, map: &TreeMap) -> Result<Oid, WorktreeError> {
        let mut root = TreeNode::default();
        for (path, oid) in map {
            let segments: Vec<&str> = path.split('/').collect();
            root.insert(&segments, oid.clone());
        }
        self.store_node(&root)
    }

    fn store_node(&self, node: &TreeNode) -> Result<Oid, WorktreeError> {
        let mut entries = Vec::new();
        for (name, oid) in &node.files {
            entries.push(TreeEntry::new(name.clone(), oid.clone(), ObjectType::Blob));
        }
        for (name, child) in &node.dirs {
            let oid = self.store_node(child)?;
            entries.push(TreeEntry::new(name.clone(), oid, ObjectType::Tree));
        }
        Ok(self.objects.put(&encode_tree(&entries), ObjectType::Tree)?)
    }

    /// Replace the working directory contents with a stored tree.
    ///
    /// Clears every non-excluded file (and then every now-empty directory;
    /// removal failures from ignored residue are swallowed), then writes
    /// each blob of the flattened tree to its path, creating parent
    /// directories as needed.
    pub fn materialize(&self, tree: &Oid) -> Result<(), WorktreeError> {
        self.clear_worktree()?;
        for (path, oid) in read_tree(self.objects, tree)? {
            let target = self.paths.work_dir().join(&path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            let payload = self.objects.get(&oid, Some(ObjectType::Blob))?;
            fs::write(target, payload)?;
        }
        Ok(())
    }

    fn clear_worktree(&self) -> Result<(), WorktreeError> {
        let entries = walk(self.paths.work_dir())?;
        // Files first.
        for (path, is_file) in &entries {
            if *is_file {
                match fs::remove_file(path) {
                    Ok(()) => {}
                    // Vanished between listing and deletion: already satisfied.
                    Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                    Err(err) => return Err(err.into()),
                }
            }
        }
        // Then directories, deepest first; non-empty residue is not fatal.
        for (path, is_file) in entries.iter().rev() {
            if !is_file {
                let _ = fs::remove_dir(path);
            }
        }
        Ok(())
    }

    /// Hash the working tree without storing anything.
    ///
    /// Used by status/diff to compare the work area against the index or a
    /// commit tree with no side effects on the object store.
    pub fn working_map(&self) -> Result<TreeMap, WorktreeError> {
        let mut map = TreeMap::new();
        for (path, is_file) in walk(self.paths.work_dir())? {
            if !is_file {
                continue;
            }
            let rel = self.relative_path(&path)?;
            let payload = fs::read(&path)?;
            map.insert(rel, Oid::for_bytes(&payload));
        }
        Ok(map)
    }

    /// Hash the working tree, storing every file as a blob.
    ///
    /// Diff reads both sides of a comparison from the object store, so the
    /// working side's contents must be present there.
    pub fn store_working_map(&self) -> Result<TreeMap, WorktreeError> {
        let mut map = TreeMap::new();
        for (path, is_file) in walk(self.paths.work_dir())? {
            if !is_file {
                continue;
            }
            let rel = self.relative_path(&path)?;
            let payload = fs::read(&path)?;
            map.insert(rel, self.objects.put(&payload, ObjectType::Blob)?);
        }
        Ok(map)
    }

    /// Stage paths into the index.
    ///
    /// A file is hashed and recorded; a directory is walked recursively and
    /// every non-excluded regular file under it staged. The caller holds the
    /// index guard, so entries hashed before a mid-walk failure still flush.
    pub fn stage(&self, index: &mut Index, paths: &[PathBuf]) -> Result<(), WorktreeError> {
        for path in paths {
            let abs = if path.is_absolute() {
                path.clone()
            } else {
                self.paths.work_dir().join(path)
            };
            if abs.is_file() {
                let rel = self.relative_path(&abs)?;
                if !is_excluded(Path::new(&rel)) {
                    self.stage_file(index, &abs)?;
                }
            } else if abs.is_dir() {
                let dir_rel = self.relative_path(&abs)?;
                if is_excluded(Path::new(&dir_rel)) {
                    continue;
                }
                for (entry, is_file) in walk(&abs)? {
                    if !is_file {
                        continue;
                    }
                    let rel = self.relative_path(&entry)?;
                    if !is_excluded(Path::new(&rel)) {
                        self.stage_file(index, &entry)?;
                    }
                }
            } else {
                return Err(WorktreeError::PathNotFound { path: path.clone() });
            }
        }
        Ok(())
    }

    fn stage_file(&self, index: &mut Index, abs: &Path) -> Result<(), WorktreeError> {
        let rel = self.relative_path(abs)?;
        let payload = fs::read(abs)?;
        let oid = self.objects.put(&payload, ObjectType::Blob)?;
        index.set(rel, oid);
        Ok(())
    }

    /// Repo-relative, forward-slash form of an absolute path.
    fn relative_path(&self, abs: &Path) -> Result<String, WorktreeError> {
        let rel = abs
            .strip_prefix(self.paths.work_dir())
            .map_err(|_| WorktreeError::OutsideWorkTree {
                path: abs.to_path_buf(),
            })?;
        let segments: Vec<String> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Ok(segments.join("/"))
    }
}

/// An owned tree of path segments, built from sorted flat paths and
/// serialized depth-first. Files and subdirectories are kept apart so a
/// name collision between the two surfaces as two entries rather than a
/// silent overwrite.
#[derive(Debug, Default)]
struct TreeNode {
    files: BTreeMap<String, Oid>,
    dirs: BTreeMap<String, TreeNode>,
}

impl TreeNode {
    fn insert(&mut self, segments: &[&str], oid: Oid) {
        // Paths in the index are non-empty and '/'-separated.
        match segments.split_first() {
            Some((name, [])) => {
                self.files.insert((*name).to_string(), oid);
            }
            Some((name, rest)) => {
                self.dirs
                    .entry((*name).to_string())
                    .or_default()
                    .insert(rest, oid);
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct WorktreeFixture {
        _dir: TempDir,
        paths: RepoPaths,
        objects: ObjectStore,
    }

    fn fixture() -> WorktreeFixture {
        let dir = TempDir::new().unwrap();
        let paths = RepoPaths::new(dir.path().to_path_buf());
        fs::create_dir_all(paths.objects_dir()).unwrap();
        let objects = ObjectStore::new(paths.objects_dir());
        WorktreeFixture {
            _dir: dir,
            paths,
            objects,
        }
    }

    impl WorktreeFixture {
        fn materializer(&self) -> Materializer<'_> {
            Materializer::new(&self.paths, &self.objects)
        }

        fn write(&self, rel: &str, content: &str) {
            let path = self.paths.work_dir().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }

        fn index(&self) -> Index {
            Index::open(self.paths.index_path()).unwrap()
        }
    }

    #[test]
    fn snapshot_worktree_and_index_fold_agree() {
        let f = fixture();
        f.write("a.txt", "alpha");
        f.write("dir/b.txt", "beta");
        f.write("dir/nested/c.txt", "gamma");

        let from_walk = f.materializer().snapshot_worktree().unwrap();

        let mut index = f.index();
        f.materializer()
            .stage(&mut index, &[PathBuf::from(".")])
            .unwrap();
        let from_index = f.materializer().snapshot_map(index.entries()).unwrap();

        // Same logical content, byte-identical encoding, same id.
        assert_eq!(from_walk, from_index);
    }

    #[test]
    fn snapshot_skips_excluded_dirs() {
        let f = fixture();
        f.write("kept.txt", "kept");
        f.write("target/skipped.txt", "skipped");

        let tree = f.materializer().snapshot_worktree().unwrap();
        let map = read_tree(&f.objects, &tree).unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["kept.txt"]);
    }

    #[test]
    fn snapshot_map_folds_deep_paths() {
        let f = fixture();
        let blob = f.objects.put(b"leaf", ObjectType::Blob).unwrap();
        let mut map = TreeMap::new();
        map.insert("a/b/c/d/e/f/g/h.txt".to_string(), blob.clone());
        map.insert("a/top.txt".to_string(), blob);

        let tree = f.materializer().snapshot_map(&map).unwrap();
        assert_eq!(read_tree(&f.objects, &tree).unwrap(), map);
    }

    #[test]
    fn materialize_roundtrip() {
        let f = fixture();
        f.write("a.txt", "one");
        f.write("deep/b.txt", "two");
        let tree = f.materializer().snapshot_worktree().unwrap();

        // Disturb the work area, then restore.
        f.write("a.txt", "changed");
        f.write("extra.txt", "junk");
        f.materializer().materialize(&tree).unwrap();

        assert_eq!(
            fs::read_to_string(f.paths.work_dir().join("a.txt")).unwrap(),
            "one"
        );
        assert_eq!(
            fs::read_to_string(f.paths.work_dir().join("deep/b.txt")).unwrap(),
            "two"
        );
        assert!(!f.paths.work_dir().join("extra.txt").exists());
        // Re-snapshot proves the restore is exact.
        assert_eq!(f.materializer().snapshot_worktree().unwrap(), tree);
    }

    #[test]
    fn materialize_preserves_control_dir() {
        let f = fixture();
        f.write("a.txt", "one");
        let tree = f.materializer().snapshot_worktree().unwrap();
        f.materializer().materialize(&tree).unwrap();
        assert!(f.paths.objects_dir().exists());
    }

    #[test]
    fn stage_single_file() {
        let f = fixture();
        f.write("a.txt", "staged content");
        let mut index = f.index();
        f.materializer()
            .stage(&mut index, &[PathBuf::from("a.txt")])
            .unwrap();
        assert_eq!(
            index.get("a.txt"),
            Some(&Oid::for_bytes(b"staged content"))
        );
    }

    #[test]
    fn stage_directory_recursively() {
        let f = fixture();
        f.write("dir/a.txt", "a");
        f.write("dir/sub/b.txt", "b");
        f.write("dir/target/skip.txt", "skip");
        f.write("outside.txt", "out");

        let mut index = f.index();
        f.materializer()
            .stage(&mut index, &[PathBuf::from("dir")])
            .unwrap();

        let staged: Vec<_> = index.entries().keys().cloned().collect();
        assert_eq!(staged, vec!["dir/a.txt", "dir/sub/b.txt"]);
    }

    #[test]
    fn stage_excluded_directory_argument_is_ignored() {
        let f = fixture();
        f.write("target/debug/artifact.bin", "bits");
        let mut index = f.index();

        f.materializer()
            .stage(&mut index, &[PathBuf::from("target")])
            .unwrap();
        assert!(index.is_empty());

        // A path inside an excluded directory is skipped too.
        f.materializer()
            .stage(&mut index, &[PathBuf::from("target/debug")])
            .unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn stage_missing_path_fails() {
        let f = fixture();
        let mut index = f.index();
        assert!(matches!(
            f.materializer()
                .stage(&mut index, &[PathBuf::from("nope.txt")]),
            Err(WorktreeError::PathNotFound { .. })
        ));
    }

    #[test]
    fn working_map_hashes_without_storing() {
        let f = fixture();
        f.write("a.txt", "content");
        let map = f.materializer().working_map().unwrap();
        let oid = Oid::for_bytes(b"content");
        assert_eq!(map.get("a.txt"), Some(&oid));
        assert!(!f.objects.contains(&oid));
    }

    #[test]
    fn store_working_map_persists_blobs() {
        let f = fixture();
        f.write("a.txt", "content");
        let map = f.materializer().store_working_map().unwrap();
        let oid = Oid::for_bytes(b"content");
        assert_eq!(map.get("a.txt"), Some(&oid));
        assert!(f.objects.contains(&oid));
    }

    #[test]
    fn empty_worktree_snapshots_to_empty_tree() {
        let f = fixture();
        let tree = f.materializer().snapshot_worktree().unwrap();
        assert!(read_tree(&f.objects, &tree).unwrap().is_empty());
    }
}
