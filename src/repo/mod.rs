//! repo
//!
//! The [`Repository`] handle, tying the stores, codec, graph, materializer,
//! and merge orchestrator together.
//!
//! # Design
//!
//! The active repository is an explicit value threaded through every
//! operation, never ambient process state. Operations that touch another
//! repository (same-host fetch) construct a second handle and pass it
//! explicitly.

pub mod revision;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::codec::commit::{encode_commit, read_commit, Commit};
use crate::codec::tree::TreeMap;
use crate::codec::{read_tree, CodecError};
use crate::core::config::{ConfigError, RepoConfig};
use crate::core::paths::RepoPaths;
use crate::core::types::{ObjectType, Oid, RefName, TypeError};
use crate::graph::{CommitGraph, GraphError};
use crate::merge::{diff_trees, merge_trees, ChangeKind, MergeError};
use crate::store::index::IndexError;
use crate::store::objects::ObjectError;
use crate::store::refs::RefError;
use crate::store::{Index, ObjectStore, RefStore, RefValue};
use crate::worktree::{Materializer, WorktreeError};
use revision::RevisionError;

/// The reference recording an in-progress merge's incoming commit.
const MERGE_HEAD: &str = "MERGE_HEAD";

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("not a vellum repository (or any parent directory): {path}")]
    NotARepository { path: PathBuf },

    #[error("repository already initialized at {path}")]
    AlreadyInitialized { path: PathBuf },

    #[error("HEAD does not point at any commit yet")]
    UnbornHead,

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error(transparent)]
    Type(#[from] TypeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Object(#[from] ObjectError),

    #[error(transparent)]
    Ref(#[from] RefError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Worktree(#[from] WorktreeError),

    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error(transparent)]
    Revision(#[from] RevisionError),
}

/// How a merge concluded.
#[derive(Debug)]
pub enum MergeOutcome {
    /// The current tip was an ancestor of the incoming commit: the branch
    /// pointer moved to the incoming commit and no new commit was created.
    FastForward { tip: Oid },
    /// A three-way merged tree was materialized into the working area.
    /// `MERGE_HEAD` is left set; the next commit records two parents.
    Merged { conflicts: Vec<String> },
}

/// A snapshot of repository state for display.
#[derive(Debug)]
pub struct Status {
    /// Current branch name, or `None` when HEAD is detached or unborn.
    pub branch: Option<String>,
    /// The commit HEAD resolves to, if any.
    pub head: Option<Oid>,
    /// Whether `MERGE_HEAD` is set.
    pub merge_in_progress: bool,
    /// Differences between the HEAD tree and the staging index.
    pub staged: Vec<(String, ChangeKind)>,
    /// Differences between the staging index and the working tree.
    pub unstaged: Vec<(String, ChangeKind)>,
}

/// An open repository.
#[derive(Debug)]
pub struct Repository {
    paths: RepoPaths,
    objects: ObjectStore,
    refs: RefStore,
    config: RepoConfig,
}

impl Repository {
    /// Create a new repository at `work_dir`.
    ///
    /// Writes the control directory, a default config, and a symbolic
    /// `HEAD` aimed at the configured default branch (which is created on
    /// the first commit).
    pub fn init(work_dir: &Path) -> Result<Self, RepoError> {
        let paths = RepoPaths::new(work_dir.to_path_buf());
        if paths.control_dir().exists() {
            return Err(RepoError::AlreadyInitialized {
                path: work_dir.to_path_buf(),
            });
        }
        std::fs::create_dir_all(paths.objects_dir())?;

        let config = RepoConfig::default();
        config.save(&paths.config_path())?;

        let repo = Self::assemble(paths, config);
        let default_branch = RefName::for_branch(&repo.config.default_branch);
        repo.refs
            .update("HEAD", &RefValue::Symbolic(default_branch), false)?;
        Ok(repo)
    }

    /// Open the repository containing `start`, searching upward.
    pub fn open(start: &Path) -> Result<Self, RepoError> {
        let paths = RepoPaths::discover(start).ok_or_else(|| RepoError::NotARepository {
            path: start.to_path_buf(),
        })?;
        let config = RepoConfig::load(&paths.config_path())?;
        Ok(Self::assemble(paths, config))
    }

    fn assemble(paths: RepoPaths, config: RepoConfig) -> Self {
        let objects = ObjectStore::new(paths.objects_dir());
        let refs = RefStore::new(paths.control_dir());
        Self {
            paths,
            objects,
            refs,
            config,
        }
    }

    pub fn paths(&self) -> &RepoPaths {
        &self.paths
    }

    pub fn objects(&self) -> &ObjectStore {
        &self.objects
    }

    pub fn refs(&self) -> &RefStore {
        &self.refs
    }

    pub fn config(&self) -> &RepoConfig {
        &self.config
    }

    /// The commit graph over this repository's objects.
    pub fn graph(&self) -> CommitGraph<'_> {
        CommitGraph::new(&self.objects)
    }

    /// The working-tree materializer for this repository.
    pub fn materializer(&self) -> Materializer<'_> {
        Materializer::new(&self.paths, &self.objects)
    }

    /// Acquire the staging index.
    pub fn index(&self) -> Result<Index, RepoError> {
        Ok(Index::open(self.paths.index_path())?)
    }

    /// Resolve a user-supplied revision string.
    pub fn resolve_revision(&self, rev: &str) -> Result<Oid, RepoError> {
        Ok(revision::resolve(&self.refs, rev)?)
    }

    /// The commit HEAD currently resolves to, if any.
    pub fn head(&self) -> Result<Option<Oid>, RepoError> {
        Ok(self.refs.resolve("HEAD", true)?.oid().cloned())
    }

    /// The branch HEAD points at without dereferencing, if symbolic.
    pub fn current_branch(&self) -> Result<Option<String>, RepoError> {
        match self.refs.resolve("HEAD", false)? {
            RefValue::Symbolic(name) => Ok(name
                .strip_prefix("refs/heads/")
                .map(str::to_string)
                .or_else(|| Some(name.to_string()))),
            _ => Ok(None),
        }
    }

    /// The flattened tree of HEAD's commit; empty before the first commit.
    pub fn head_tree(&self) -> Result<TreeMap, RepoError> {
        match self.head()? {
            Some(head) => {
                let commit = read_commit(&self.objects, &head)?;
                Ok(read_tree(&self.objects, &commit.tree)?)
            }
            None => Ok(TreeMap::new()),
        }
    }

    /// Stage paths into the index.
    pub fn add(&self, paths: &[PathBuf]) -> Result<(), RepoError> {
        let mut index = self.index()?;
        self.materializer().stage(&mut index, paths)?;
        index.flush()?;
        Ok(())
    }

    /// Record the staged index as a commit and advance HEAD.
    ///
    /// The current HEAD commit (if any) becomes the first parent. A set
    /// `MERGE_HEAD` becomes the second parent and is cleared without
    /// following symbolic indirection.
    pub fn commit(&self, message: &str) -> Result<Oid, RepoError> {
        let mut index = self.index()?;
        let tree = self.materializer().snapshot_map(index.entries())?;

        let mut parents = Vec::new();
        if let Some(head) = self.head()? {
            parents.push(head);
        }
        if let RefValue::Direct(merge_head) = self.refs.resolve(MERGE_HEAD, true)? {
            parents.push(merge_head);
            self.refs.delete(MERGE_HEAD, false)?;
        }

        let commit = Commit {
            tree,
            parents,
            message: message.to_string(),
        };
        let oid = self
            .objects
            .put(&encode_commit(&commit), ObjectType::Commit)?;
        self.refs
            .update("HEAD", &RefValue::Direct(oid.clone()), true)?;
        index.flush()?;
        Ok(oid)
    }

    /// Materialize a revision's tree and move HEAD.
    ///
    /// The staging index is reset to the materialized tree. When the
    /// revision names a branch, HEAD becomes symbolic to it; otherwise HEAD
    /// detaches to the commit id.
    pub fn checkout(&self, rev: &str) -> Result<Oid, RepoError> {
        let oid = self.resolve_revision(rev)?;
        let commit = read_commit(&self.objects, &oid)?;
        self.materializer().materialize(&commit.tree)?;

        let mut index = self.index()?;
        index.replace(read_tree(&self.objects, &commit.tree)?);
        index.flush()?;

        let branch_ref = RefName::for_branch(rev);
        let value = if !self
            .refs
            .resolve(branch_ref.as_str(), true)?
            .is_unset()
        {
            RefValue::Symbolic(branch_ref)
        } else {
            RefValue::Direct(oid.clone())
        };
        self.refs.update("HEAD", &value, false)?;
        Ok(oid)
    }

    /// Create (or move) a branch pointing at a commit.
    pub fn create_branch(&self, name: &str, target: &Oid) -> Result<(), RepoError> {
        let refname = RefName::for_branch(name);
        self.refs
            .update(refname.as_str(), &RefValue::Direct(target.clone()), true)?;
        Ok(())
    }

    /// All branches, sorted by name.
    pub fn branches(&self) -> Result<Vec<(String, Oid)>, RepoError> {
        let mut out = Vec::new();
        for (name, value) in self.refs.iter("refs/heads/")? {
            if let RefValue::Direct(oid) = value {
                let short = name.trim_start_matches("refs/heads/").to_string();
                out.push((short, oid));
            }
        }
        Ok(out)
    }

    /// Create a tag pointing at a commit.
    pub fn create_tag(&self, name: &str, target: &Oid) -> Result<(), RepoError> {
        let refname = RefName::for_tag(name);
        self.refs
            .update(refname.as_str(), &RefValue::Direct(target.clone()), true)?;
        Ok(())
    }

    /// Move HEAD (through its symbolic chain) to a commit.
    pub fn reset(&self, target: &Oid) -> Result<(), RepoError> {
        self.refs
            .update("HEAD", &RefValue::Direct(target.clone()), true)?;
        Ok(())
    }

    /// Merge a revision into the current HEAD.
    ///
    /// Computes the merge base of (incoming, current tip). When the base
    /// equals the current tip this is a fast-forward: the incoming tree is
    /// materialized and the branch pointer moves, creating no commit.
    /// Otherwise the incoming id is recorded under `MERGE_HEAD`, the
    /// three-way merged tree is materialized, and the caller must commit to
    /// conclude the merge.
    pub fn merge(&self, rev: &str) -> Result<MergeOutcome, RepoError> {
        let incoming = self.resolve_revision(rev)?;
        let head = self.head()?.ok_or(RepoError::UnbornHead)?;
        let base = self.graph().merge_base(&incoming, &head)?;

        let incoming_commit = read_commit(&self.objects, &incoming)?;
        if base == head {
            self.materializer().materialize(&incoming_commit.tree)?;
            let mut index = self.index()?;
            index.replace(read_tree(&self.objects, &incoming_commit.tree)?);
            index.flush()?;
            self.refs
                .update("HEAD", &RefValue::Direct(incoming.clone()), true)?;
            return Ok(MergeOutcome::FastForward { tip: incoming });
        }

        self.refs
            .update(MERGE_HEAD, &RefValue::Direct(incoming.clone()), false)?;

        let base_commit = read_commit(&self.objects, &base)?;
        let head_commit = read_commit(&self.objects, &head)?;
        let base_tree = read_tree(&self.objects, &base_commit.tree)?;
        let head_tree = read_tree(&self.objects, &head_commit.tree)?;
        let other_tree = read_tree(&self.objects, &incoming_commit.tree)?;

        let merged = merge_trees(
            &self.objects,
            &self.config.merge_tool,
            &base_tree,
            &head_tree,
            &other_tree,
        )?;
        let merged_tree = self.materializer().snapshot_map(&merged.map)?;
        self.materializer().materialize(&merged_tree)?;

        // Staged state mirrors the merged working area so the concluding
        // commit snapshots it.
        let mut index = self.index()?;
        index.replace(merged.map.clone());
        index.flush()?;

        Ok(MergeOutcome::Merged {
            conflicts: merged.conflicts,
        })
    }

    /// Copy branch refs (and the objects they reach) from another
    /// repository on the same host.
    ///
    /// Remote `refs/heads/<name>` land locally as `refs/remote/<name>`.
    /// Returns the copied (local name, oid) pairs.
    pub fn fetch(&self, remote_path: &Path) -> Result<Vec<(String, Oid)>, RepoError> {
        let remote = Repository::open(remote_path)?;

        let mut heads = Vec::new();
        for (name, value) in remote.refs.iter("refs/heads/")? {
            if let RefValue::Direct(oid) = value {
                heads.push((name, oid));
            }
        }

        let tips: Vec<Oid> = heads.iter().map(|(_, oid)| oid.clone()).collect();
        for oid in remote.graph().reachable_objects(tips) {
            remote.objects.copy_to(&oid?, &self.objects)?;
        }

        let mut copied = Vec::new();
        for (name, oid) in heads {
            let short = name.trim_start_matches("refs/heads/");
            let local = format!("refs/remote/{short}");
            self.refs
                .update(&local, &RefValue::Direct(oid.clone()), true)?;
            copied.push((local, oid));
        }
        Ok(copied)
    }

    /// Summarize branch, merge, staged, and unstaged state.
    pub fn status(&self) -> Result<Status, RepoError> {
        let head_tree = self.head_tree()?;
        let index = self.index()?;
        let working = self.materializer().working_map()?;

        Ok(Status {
            branch: self.current_branch()?,
            head: self.head()?,
            merge_in_progress: !self.refs.resolve(MERGE_HEAD, true)?.is_unset(),
            staged: diff_trees(&head_tree, index.entries()),
            unstaged: diff_trees(index.entries(), &working),
        })
    }
}
