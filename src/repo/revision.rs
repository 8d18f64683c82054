//! repo::revision
//!
//! Resolution of user-supplied revision strings to object ids.
//!
//! The literal `@` aliases `HEAD`. Candidates are then tried in order:
//! the literal name, `refs/<name>`, `refs/tags/<name>`, `refs/heads/<name>`.
//! If none resolves and the string is exactly 40 hexadecimal characters, it
//! is taken as a literal object id. Anything else is `UnknownRevision`,
//! surfaced verbatim.

use thiserror::Error;

use crate::core::types::Oid;
use crate::store::refs::{RefError, RefStore, RefValue};

/// Errors from revision resolution.
#[derive(Debug, Error)]
pub enum RevisionError {
    /// User input error; never retried.
    #[error("unknown revision: {0}")]
    UnknownRevision(String),

    #[error(transparent)]
    Ref(#[from] RefError),
}

/// Resolve a revision string against a ref store.
pub fn resolve(refs: &RefStore, revision: &str) -> Result<Oid, RevisionError> {
    let name = if revision == "@" { "HEAD" } else { revision };

    let candidates = [
        name.to_string(),
        format!("refs/{name}"),
        format!("refs/tags/{name}"),
        format!("refs/heads/{name}"),
    ];
    for candidate in &candidates {
        if let RefValue::Direct(oid) = refs.resolve(candidate, true)? {
            return Ok(oid);
        }
    }

    if name.len() == Oid::HEX_LEN {
        if let Ok(oid) = Oid::new(name) {
            return Ok(oid);
        }
    }

    Err(RevisionError::UnknownRevision(revision.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::RefName;
    use tempfile::TempDir;

    struct RevFixture {
        _dir: TempDir,
        refs: RefStore,
    }

    fn fixture() -> RevFixture {
        let dir = TempDir::new().unwrap();
        let refs = RefStore::new(dir.path().to_path_buf());
        RevFixture { _dir: dir, refs }
    }

    fn oid(byte: u8) -> Oid {
        Oid::new(format!("{:02x}", byte).repeat(20)).unwrap()
    }

    #[test]
    fn at_aliases_head() {
        let f = fixture();
        f.refs
            .update("HEAD", &RefValue::Direct(oid(1)), true)
            .unwrap();
        assert_eq!(resolve(&f.refs, "@").unwrap(), oid(1));
    }

    #[test]
    fn bare_branch_name_resolves_through_heads() {
        let f = fixture();
        f.refs
            .update("refs/heads/main", &RefValue::Direct(oid(2)), true)
            .unwrap();
        assert_eq!(resolve(&f.refs, "main").unwrap(), oid(2));
        assert_eq!(resolve(&f.refs, "refs/heads/main").unwrap(), oid(2));
    }

    #[test]
    fn tags_tried_before_heads() {
        let f = fixture();
        f.refs
            .update("refs/tags/v1", &RefValue::Direct(oid(3)), true)
            .unwrap();
        f.refs
            .update("refs/heads/v1", &RefValue::Direct(oid(4)), true)
            .unwrap();
        assert_eq!(resolve(&f.refs, "v1").unwrap(), oid(3));
    }

    #[test]
    fn forty_hex_is_a_literal_oid() {
        let f = fixture();
        let literal = oid(5);
        assert_eq!(resolve(&f.refs, literal.as_str()).unwrap(), literal);
    }

    #[test]
    fn symbolic_head_resolves_to_branch_tip() {
        let f = fixture();
        f.refs
            .update(
                "HEAD",
                &RefValue::Symbolic(RefName::new("refs/heads/main").unwrap()),
                false,
            )
            .unwrap();
        f.refs
            .update("refs/heads/main", &RefValue::Direct(oid(6)), true)
            .unwrap();
        assert_eq!(resolve(&f.refs, "@").unwrap(), oid(6));
    }

    #[test]
    fn unknown_revision_surfaced_verbatim() {
        let f = fixture();
        let err = resolve(&f.refs, "no-such-thing").unwrap_err();
        assert!(matches!(
            err,
            RevisionError::UnknownRevision(name) if name == "no-such-thing"
        ));
    }

    #[test]
    fn short_hex_is_not_an_oid() {
        let f = fixture();
        assert!(matches!(
            resolve(&f.refs, "abc123"),
            Err(RevisionError::UnknownRevision(_))
        ));
    }
}
