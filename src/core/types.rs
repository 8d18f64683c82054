//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`Oid`] - Object identifier (hex SHA-1 of an object's payload)
//! - [`RefName`] - Validated reference name
//! - [`ObjectType`] - Type tag stored alongside object payloads
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, preventing entire classes of bugs.
//!
//! # Examples
//!
//! ```
//! use vellum::core::types::{Oid, RefName};
//!
//! let oid = Oid::new("abc123def4567890abc123def4567890abc12345").unwrap();
//! let refname = RefName::new("refs/heads/main").unwrap();
//!
//! assert!(Oid::new("not-a-digest").is_err());
//! assert!(RefName::new("bad..name").is_err());
//! ```

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid object id: {0}")]
    InvalidOid(String),

    #[error("invalid ref name: {0}")]
    InvalidRefName(String),
}

/// An object identifier: the lowercase hex SHA-1 digest of an object's
/// payload bytes (the type tag is not hashed).
///
/// # Example
///
/// ```
/// use vellum::core::types::Oid;
///
/// // Normalized to lowercase
/// let oid = Oid::new("ABC123DEF4567890ABC123DEF4567890ABC12345").unwrap();
/// assert_eq!(oid.as_str(), "abc123def4567890abc123def4567890abc12345");
///
/// // Abbreviated form
/// assert_eq!(oid.short(7), "abc123d");
///
/// // Hashing is deterministic
/// assert_eq!(Oid::for_bytes(b"hello"), Oid::for_bytes(b"hello"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Oid(String);

impl Oid {
    /// Length of a hex SHA-1 digest.
    pub const HEX_LEN: usize = 40;

    /// Create a new validated object id.
    ///
    /// The id is normalized to lowercase.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidOid` if the string is not 40 hex characters.
    pub fn new(oid: impl Into<String>) -> Result<Self, TypeError> {
        let oid = oid.into().to_ascii_lowercase();
        Self::validate(&oid)?;
        Ok(Self(oid))
    }

    /// Compute the object id for a byte payload.
    ///
    /// This is the single hashing routine in the crate; the object store and
    /// status computation both go through it so ids always agree.
    pub fn for_bytes(payload: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(payload);
        Self(hex::encode(hasher.finalize()))
    }

    /// Get an abbreviated form of the id.
    ///
    /// Returns the first `len` characters, or the full id if `len` exceeds it.
    pub fn short(&self, len: usize) -> &str {
        let end = len.min(self.0.len());
        &self.0[..end]
    }

    fn validate(oid: &str) -> Result<(), TypeError> {
        if oid.len() != Self::HEX_LEN {
            return Err(TypeError::InvalidOid(format!(
                "expected {} hex characters, got {}",
                Self::HEX_LEN,
                oid.len()
            )));
        }
        if !oid.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidOid(
                "object id must be hexadecimal".into(),
            ));
        }
        Ok(())
    }

    /// Get the object id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Oid {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Oid> for String {
    fn from(oid: Oid) -> Self {
        oid.0
    }
}

impl AsRef<str> for Oid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Oid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The type tag stored alongside every object payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    /// Raw file content.
    Blob,
    /// A sorted list of named entries.
    Tree,
    /// A tree reference plus parents and a message.
    Commit,
}

impl ObjectType {
    /// The stable string form used in object records and tree entries.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Tree => "tree",
            ObjectType::Commit => "commit",
        }
    }

    /// Parse a type tag. Returns `None` for unknown tags.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "blob" => Some(ObjectType::Blob),
            "tree" => Some(ObjectType::Tree),
            "commit" => Some(ObjectType::Commit),
            _ => None,
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A validated reference name.
///
/// Covers both the fixed entries (`HEAD`, `MERGE_HEAD`) and namespaced refs
/// (`refs/heads/main`, `refs/tags/v1`). Names double as storage paths under
/// the control directory, so the rules reject anything that could escape or
/// alias a path.
///
/// # Example
///
/// ```
/// use vellum::core::types::RefName;
///
/// let head = RefName::new("HEAD").unwrap();
/// let branch = RefName::for_branch("main");
/// assert_eq!(branch.as_str(), "refs/heads/main");
/// assert_eq!(branch.strip_prefix("refs/heads/"), Some("main"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RefName(String);

impl RefName {
    /// Create a new validated ref name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidRefName` if the name violates the rules.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    /// Create a ref name for a branch (`refs/heads/<branch>`).
    pub fn for_branch(branch: &str) -> Self {
        Self(format!("refs/heads/{branch}"))
    }

    /// Create a ref name for a tag (`refs/tags/<tag>`).
    pub fn for_tag(tag: &str) -> Self {
        Self(format!("refs/tags/{tag}"))
    }

    /// Strip a prefix from the ref name and return the remainder.
    pub fn strip_prefix(&self, prefix: &str) -> Option<&str> {
        self.0.strip_prefix(prefix)
    }

    /// Check if this ref is a branch ref.
    pub fn is_branch_ref(&self) -> bool {
        self.0.starts_with("refs/heads/")
    }

    fn validate(name: &str) -> Result<(), TypeError> {
        if name.is_empty() {
            return Err(TypeError::InvalidRefName("ref name cannot be empty".into()));
        }
        if name.starts_with('/') || name.ends_with('/') {
            return Err(TypeError::InvalidRefName(
                "ref name cannot start or end with '/'".into(),
            ));
        }
        if name.contains("..") {
            return Err(TypeError::InvalidRefName(
                "ref name cannot contain '..'".into(),
            ));
        }
        if name.contains("//") {
            return Err(TypeError::InvalidRefName(
                "ref name cannot contain '//'".into(),
            ));
        }
        const INVALID_CHARS: [char; 8] = [' ', '~', '^', ':', '\\', '?', '*', '['];
        for c in INVALID_CHARS {
            if name.contains(c) {
                return Err(TypeError::InvalidRefName(format!(
                    "ref name cannot contain '{c}'"
                )));
            }
        }
        for c in name.chars() {
            if c.is_ascii_control() {
                return Err(TypeError::InvalidRefName(
                    "ref name cannot contain control characters".into(),
                ));
            }
        }
        for component in name.split('/') {
            if component.starts_with('.') {
                return Err(TypeError::InvalidRefName(
                    "path component cannot start with '.'".into(),
                ));
            }
        }
        Ok(())
    }

    /// Get the ref name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RefName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RefName> for String {
    fn from(name: RefName) -> Self {
        name.0
    }
}

impl AsRef<str> for RefName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RefName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod oid {
        use super::*;

        #[test]
        fn valid_oid() {
            assert!(Oid::new("abc123def4567890abc123def4567890abc12345").is_ok());
        }

        #[test]
        fn normalizes_to_lowercase() {
            let oid = Oid::new("ABC123DEF4567890ABC123DEF4567890ABC12345").unwrap();
            assert_eq!(oid.as_str(), "abc123def4567890abc123def4567890abc12345");
        }

        #[test]
        fn invalid_length() {
            assert!(Oid::new("").is_err());
            assert!(Oid::new("abc123").is_err());
            assert!(Oid::new("a".repeat(64)).is_err());
        }

        #[test]
        fn non_hex_rejected() {
            assert!(Oid::new("xyz123def4567890abc123def4567890abc12345").is_err());
        }

        #[test]
        fn hashing_is_deterministic() {
            let a = Oid::for_bytes(b"some content");
            let b = Oid::for_bytes(b"some content");
            assert_eq!(a, b);
            assert_ne!(a, Oid::for_bytes(b"other content"));
        }

        #[test]
        fn hash_has_expected_width() {
            assert_eq!(Oid::for_bytes(b"").as_str().len(), Oid::HEX_LEN);
        }

        #[test]
        fn short_form() {
            let oid = Oid::new("abc123def4567890abc123def4567890abc12345").unwrap();
            assert_eq!(oid.short(7), "abc123d");
            assert_eq!(oid.short(100), oid.as_str());
        }

        #[test]
        fn serde_roundtrip() {
            let oid = Oid::new("abc123def4567890abc123def4567890abc12345").unwrap();
            let json = serde_json::to_string(&oid).unwrap();
            let parsed: Oid = serde_json::from_str(&json).unwrap();
            assert_eq!(oid, parsed);
        }
    }

    mod object_type {
        use super::*;

        #[test]
        fn string_forms_roundtrip() {
            for t in [ObjectType::Blob, ObjectType::Tree, ObjectType::Commit] {
                assert_eq!(ObjectType::parse(t.as_str()), Some(t));
            }
        }

        #[test]
        fn unknown_tag_rejected() {
            assert_eq!(ObjectType::parse("tag"), None);
            assert_eq!(ObjectType::parse(""), None);
        }
    }

    mod ref_name {
        use super::*;

        #[test]
        fn valid_refs() {
            assert!(RefName::new("HEAD").is_ok());
            assert!(RefName::new("MERGE_HEAD").is_ok());
            assert!(RefName::new("refs/heads/main").is_ok());
            assert!(RefName::new("refs/tags/v1.0").is_ok());
        }

        #[test]
        fn for_branch_and_tag() {
            assert_eq!(RefName::for_branch("main").as_str(), "refs/heads/main");
            assert_eq!(RefName::for_tag("v1").as_str(), "refs/tags/v1");
            assert!(RefName::for_branch("main").is_branch_ref());
            assert!(!RefName::for_tag("v1").is_branch_ref());
        }

        #[test]
        fn empty_rejected() {
            assert!(RefName::new("").is_err());
        }

        #[test]
        fn path_escapes_rejected() {
            assert!(RefName::new("/refs/heads/main").is_err());
            assert!(RefName::new("refs/heads/").is_err());
            assert!(RefName::new("refs/../../etc").is_err());
            assert!(RefName::new("refs//heads/main").is_err());
            assert!(RefName::new("refs/heads/.hidden").is_err());
        }

        #[test]
        fn special_chars_rejected() {
            assert!(RefName::new("has space").is_err());
            assert!(RefName::new("has~tilde").is_err());
            assert!(RefName::new("has\nnewline").is_err());
        }
    }
}
