//! graph
//!
//! Commit-graph traversal, ancestry queries, and merge-base computation.
//!
//! # Traversal discipline
//!
//! [`CommitGraph::ancestors`] is breadth-first with a visited set, so every
//! reachable commit is produced exactly once and criss-cross merge
//! topologies cannot loop. Each commit's first parent goes to the front of
//! the pending queue while remaining parents append to the back, biasing
//! traversal toward the first-parent chain without skipping anything.
//!
//! # Merge-base tie-break
//!
//! [`CommitGraph::merge_base`] eagerly collects the ancestor set of its
//! first argument, then streams the second argument's ancestors and returns
//! the first hit. Among multiple lowest common ancestors this picks the one
//! traversal reaches first; the choice is deterministic but not symmetric
//! in its arguments, and callers must treat that as the defined tie-break.

use std::collections::{HashSet, VecDeque};

use thiserror::Error;

use crate::codec::tree::decode_tree;
use crate::codec::{read_commit, CodecError};
use crate::core::types::{ObjectType, Oid};
use crate::store::objects::ObjectError;
use crate::store::ObjectStore;

/// Errors from commit-graph operations.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Two histories share no common ancestor. The caller decides whether
    /// to abort or force a non-merge-base strategy.
    #[error("no common ancestor between {left} and {right}")]
    NoCommonAncestor { left: Oid, right: Oid },

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Object(#[from] ObjectError),
}

/// Traversal and ancestry queries over stored commits.
#[derive(Debug, Clone, Copy)]
pub struct CommitGraph<'a> {
    objects: &'a ObjectStore,
}

impl<'a> CommitGraph<'a> {
    pub fn new(objects: &'a ObjectStore) -> Self {
        Self { objects }
    }

    /// Lazily walk every commit reachable from `start`, including the start
    /// commits themselves, each exactly once.
    pub fn ancestors(&self, start: impl IntoIterator<Item = Oid>) -> Ancestors<'a> {
        Ancestors {
            objects: self.objects,
            pending: start.into_iter().collect(),
            visited: HashSet::new(),
        }
    }

    /// Whether `candidate` is reachable from `commit` (inclusive).
    pub fn is_ancestor(&self, commit: &Oid, candidate: &Oid) -> Result<bool, GraphError> {
        for oid in self.ancestors([commit.clone()]) {
            if &oid? == candidate {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Find a common ancestor of two commits.
    ///
    /// Collects the full ancestor set of `first`, then streams `second`'s
    /// ancestors in traversal order and returns the first member of that
    /// set.
    ///
    /// # Errors
    ///
    /// `NoCommonAncestor` if the streamed sequence exhausts without a hit
    /// (disjoint, root-less histories).
    pub fn merge_base(&self, first: &Oid, second: &Oid) -> Result<Oid, GraphError> {
        let mut first_ancestors = HashSet::new();
        for oid in self.ancestors([first.clone()]) {
            first_ancestors.insert(oid?);
        }
        for oid in self.ancestors([second.clone()]) {
            let oid = oid?;
            if first_ancestors.contains(&oid) {
                return Ok(oid);
            }
        }
        Err(GraphError::NoCommonAncestor {
            left: first.clone(),
            right: second.clone(),
        })
    }

    /// Lazily walk every object reachable from the given commits: each
    /// commit, its tree, and every transitively reachable subtree and blob,
    /// deduplicated across the whole walk.
    ///
    /// Used for export steps such as same-host fetch; the merge path does
    /// not otherwise consume it.
    pub fn reachable_objects(&self, start: impl IntoIterator<Item = Oid>) -> ReachableObjects<'a> {
        ReachableObjects {
            objects: self.objects,
            commits: self.ancestors(start),
            buffer: VecDeque::new(),
            visited: HashSet::new(),
        }
    }
}

/// Lazy breadth-first commit walk. See [`CommitGraph::ancestors`].
pub struct Ancestors<'a> {
    objects: &'a ObjectStore,
    pending: VecDeque<Oid>,
    visited: HashSet<Oid>,
}

impl Iterator for Ancestors<'_> {
    type Item = Result<Oid, GraphError>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(oid) = self.pending.pop_front() {
            if !self.visited.insert(oid.clone()) {
                continue;
            }
            let commit = match read_commit(self.objects, &oid) {
                Ok(commit) => commit,
                Err(err) => return Some(Err(err.into())),
            };
            // First parent jumps the queue; the rest wait at the back.
            let mut parents = commit.parents.into_iter();
            if let Some(first) = parents.next() {
                self.pending.push_front(first);
            }
            for parent in parents {
                self.pending.push_back(parent);
            }
            return Some(Ok(oid));
        }
        None
    }
}

/// Lazy object-level walk. See [`CommitGraph::reachable_objects`].
pub struct ReachableObjects<'a> {
    objects: &'a ObjectStore,
    commits: Ancestors<'a>,
    buffer: VecDeque<Oid>,
    visited: HashSet<Oid>,
}

impl ReachableObjects<'_> {
    /// Collect a tree's own oid plus its transitive subtree and blob oids
    /// into the buffer, skipping anything already seen.
    fn expand_tree(&mut self, tree: &Oid) -> Result<(), GraphError> {
        if !self.visited.insert(tree.clone()) {
            return Ok(());
        }
        self.buffer.push_back(tree.clone());
        let payload = self.objects.get(tree, Some(ObjectType::Tree))?;
        for entry in decode_tree(&payload)? {
            match entry.kind {
                ObjectType::Tree => self.expand_tree(&entry.oid)?,
                _ => {
                    if self.visited.insert(entry.oid.clone()) {
                        self.buffer.push_back(entry.oid);
                    }
                }
            }
        }
        Ok(())
    }
}

impl Iterator for ReachableObjects<'_> {
    type Item = Result<Oid, GraphError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(oid) = self.buffer.pop_front() {
                return Some(Ok(oid));
            }
            let commit_oid = match self.commits.next()? {
                Ok(oid) => oid,
                Err(err) => return Some(Err(err)),
            };
            let commit = match read_commit(self.commits.objects, &commit_oid) {
                Ok(commit) => commit,
                Err(err) => return Some(Err(err.into())),
            };
            self.visited.insert(commit_oid.clone());
            if let Err(err) = self.expand_tree(&commit.tree) {
                return Some(Err(err));
            }
            return Some(Ok(commit_oid));
        }
    }
}
