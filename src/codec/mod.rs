//! codec
//!
//! Serialization of tree and commit objects to and from the object store's
//! byte format.
//!
//! # Modules
//!
//! - [`tree`] - Sorted-entry tree encoding and recursive flattening
//! - [`commit`] - Key-value header commit encoding
//!
//! Parse errors are fatal: a corrupted object is never partially trusted.

pub mod commit;
pub mod tree;

pub use commit::{read_commit, Commit};
pub use tree::{read_tree, TreeEntry, TreeMap};

use thiserror::Error;

use crate::store::objects::ObjectError;

/// Errors from tree/commit encoding and decoding.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("malformed tree: {0}")]
    MalformedTree(String),

    #[error("malformed commit: {0}")]
    MalformedCommit(String),

    #[error("unknown commit header field: {0}")]
    UnknownField(String),

    #[error("commit is missing its tree header")]
    MissingTree,

    #[error(transparent)]
    Object(#[from] ObjectError),
}
