//! codec::tree
//!
//! Tree object encoding.
//!
//! A tree is an ordered list of `(name, oid, type)` triples, serialized one
//! entry per line as `"{type} {oid} {name}\n"`, sorted lexicographically by
//! name. Sorting makes the encoding canonical: two trees with the same
//! logical content serialize to identical bytes, which in turn gives them
//! identical object ids.

use std::collections::BTreeMap;

use super::CodecError;
use crate::core::types::{ObjectType, Oid};
use crate::store::ObjectStore;

/// A flattened tree: repo-relative path (forward slashes) to blob id.
pub type TreeMap = BTreeMap<String, Oid>;

/// One entry in a tree object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub name: String,
    pub oid: Oid,
    pub kind: ObjectType,
}

impl TreeEntry {
    pub fn new(name: impl Into<String>, oid: Oid, kind: ObjectType) -> Self {
        Self {
            name: name.into(),
            oid,
            kind,
        }
    }
}

/// Encode tree entries to the canonical payload.
///
/// Entries are sorted by name ascending (byte-wise). Duplicate names are a
/// caller error and are not defended against.
pub fn encode_tree(entries: &[TreeEntry]) -> Vec<u8> {
    let mut sorted: Vec<&TreeEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));

    let mut out = String::new();
    for entry in sorted {
        out.push_str(entry.kind.as_str());
        out.push(' ');
        out.push_str(entry.oid.as_str());
        out.push(' ');
        out.push_str(&entry.name);
        out.push('\n');
    }
    out.into_bytes()
}

/// Decode a tree payload into entries.
///
/// Each line splits into exactly three space-separated fields; the split
/// stops after the second space, so names keep any further spaces intact.
pub fn decode_tree(payload: &[u8]) -> Result<Vec<TreeEntry>, CodecError> {
    let text = std::str::from_utf8(payload)
        .map_err(|_| CodecError::MalformedTree("payload is not valid UTF-8".into()))?;

    let mut entries = Vec::new();
    for line in text.split('\n') {
        if line.is_empty() {
            continue;
        }
        let mut fields = line.splitn(3, ' ');
        let (kind, oid, name) = match (fields.next(), fields.next(), fields.next()) {
            (Some(kind), Some(oid), Some(name)) => (kind, oid, name),
            _ => {
                return Err(CodecError::MalformedTree(format!(
                    "entry line has fewer than three fields: {line:?}"
                )));
            }
        };
        let kind = ObjectType::parse(kind)
            .ok_or_else(|| CodecError::MalformedTree(format!("unknown entry type: {kind:?}")))?;
        let oid = Oid::new(oid)
            .map_err(|err| CodecError::MalformedTree(format!("entry id: {err}")))?;
        entries.push(TreeEntry::new(name, oid, kind));
    }
    Ok(entries)
}

/// Recursively flatten a stored tree into a path-to-blob map.
///
/// Subtree entries are expanded with `base_path + name + '/'` prefixes.
///
/// # Errors
///
/// `MalformedTree` if an entry name contains `/`, is `.` or `..`, or if an
/// entry's declared type is neither blob nor tree.
pub fn flatten_tree(
    objects: &ObjectStore,
    oid: &Oid,
    base_path: &str,
) -> Result<TreeMap, CodecError> {
    let payload = objects.get(oid, Some(ObjectType::Tree))?;
    let mut map = TreeMap::new();
    for entry in decode_tree(&payload)? {
        if entry.name.contains('/') || entry.name == "." || entry.name == ".." {
            return Err(CodecError::MalformedTree(format!(
                "invalid entry name: {:?}",
                entry.name
            )));
        }
        match entry.kind {
            ObjectType::Blob => {
                map.insert(format!("{base_path}{}", entry.name), entry.oid);
            }
            ObjectType::Tree => {
                let prefix = format!("{base_path}{}/", entry.name);
                map.extend(flatten_tree(objects, &entry.oid, &prefix)?);
            }
            ObjectType::Commit => {
                return Err(CodecError::MalformedTree(format!(
                    "entry {:?} declares type 'commit'",
                    entry.name
                )));
            }
        }
    }
    Ok(map)
}

/// Flatten a stored tree from the repository root.
pub fn read_tree(objects: &ObjectStore, oid: &Oid) -> Result<TreeMap, CodecError> {
    flatten_tree(objects, oid, "")
}
