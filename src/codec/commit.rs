//! codec::commit
//!
//! Commit object encoding.
//!
//! A commit serializes as one `key value` header line per field (`tree`,
//! then one `parent` line per parent, in first-parent order), a blank line,
//! and the raw message. Decoding accepts only `tree` and `parent` headers;
//! the message is everything after the first blank line, rejoined verbatim
//! so trailing structure survives a round-trip.

use super::CodecError;
use crate::core::types::{ObjectType, Oid};
use crate::store::ObjectStore;

/// A decoded commit object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// The snapshot this commit records.
    pub tree: Oid,
    /// Parent commits. The first parent is the most recent direct ancestor;
    /// later entries are merge contributors.
    pub parents: Vec<Oid>,
    /// Free-text message.
    pub message: String,
}

impl Commit {
    /// The primary parent, if any.
    pub fn first_parent(&self) -> Option<&Oid> {
        self.parents.first()
    }

    /// The first line of the message.
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}

/// Encode a commit to its payload.
pub fn encode_commit(commit: &Commit) -> Vec<u8> {
    let mut out = String::new();
    out.push_str("tree ");
    out.push_str(commit.tree.as_str());
    out.push('\n');
    for parent in &commit.parents {
        out.push_str("parent ");
        out.push_str(parent.as_str());
        out.push('\n');
    }
    out.push('\n');
    out.push_str(&commit.message);
    out.into_bytes()
}

/// Decode a commit payload.
///
/// Header lines are consumed until the first empty line; every `parent`
/// line accumulates in file order.
///
/// # Errors
///
/// - `UnknownField` for any header key other than `tree`/`parent`
/// - `MissingTree` if no `tree` header appears
/// - `MalformedCommit` for non-UTF-8 payloads or headers without a value
pub fn decode_commit(payload: &[u8]) -> Result<Commit, CodecError> {
    let text = std::str::from_utf8(payload)
        .map_err(|_| CodecError::MalformedCommit("payload is not valid UTF-8".into()))?;

    let mut lines = text.split('\n');
    let mut tree = None;
    let mut parents = Vec::new();

    for line in &mut lines {
        if line.is_empty() {
            break;
        }
        let (key, value) = line.split_once(' ').ok_or_else(|| {
            CodecError::MalformedCommit(format!("header line has no value: {line:?}"))
        })?;
        match key {
            "tree" => {
                let oid = Oid::new(value)
                    .map_err(|err| CodecError::MalformedCommit(format!("tree header: {err}")))?;
                tree = Some(oid);
            }
            "parent" => {
                let oid = Oid::new(value)
                    .map_err(|err| CodecError::MalformedCommit(format!("parent header: {err}")))?;
                parents.push(oid);
            }
            other => return Err(CodecError::UnknownField(other.to_string())),
        }
    }

    let message = lines.collect::<Vec<_>>().join("\n");
    let tree = tree.ok_or(CodecError::MissingTree)?;
    Ok(Commit {
        tree,
        parents,
        message,
    })
}

/// Load and decode a commit from the object store.
pub fn read_commit(objects: &ObjectStore, oid: &Oid) -> Result<Commit, CodecError> {
    let payload = objects.get(oid, Some(ObjectType::Commit))?;
    decode_commit(&payload)
}
