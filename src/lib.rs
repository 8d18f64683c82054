//! Vellum - a minimal content-addressable version control engine
//!
//! Vellum snapshots a directory tree into content-addressed objects, commits
//! snapshots under a parent chain, names commits through direct and symbolic
//! references, and reconciles divergent histories with a three-way merge.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to repo)
//! - [`repo`] - The [`repo::Repository`] handle orchestrating all operations
//! - [`merge`] - Tree alignment, diffing, and three-way merge
//! - [`graph`] - Commit-graph traversal and merge-base computation
//! - [`worktree`] - Snapshot, materialize, and staging operations
//! - [`codec`] - Tree and commit object encoding
//! - [`store`] - Object store, reference store, staging index
//! - [`core`] - Strong types, path routing, and configuration
//! - [`ui`] - Output utilities
//!
//! # Correctness Invariants
//!
//! Vellum maintains the following invariants:
//!
//! 1. Objects are immutable and keyed by the digest of their payload
//! 2. Tree encoding is canonical: equal logical content, equal bytes
//! 3. Reference resolution always terminates, even on symbolic cycles
//! 4. Graph traversal visits every reachable commit exactly once

pub mod cli;
pub mod codec;
pub mod core;
pub mod graph;
pub mod merge;
pub mod repo;
pub mod store;
pub mod ui;
pub mod worktree;
