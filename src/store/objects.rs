//! store::objects
//!
//! Content-addressed object storage.
//!
//! # Record format
//!
//! Each object is stored at `objects/<oid>` as `type ++ NUL ++ payload`,
//! where `oid` is the hex digest of the payload alone (not the tagged
//! record). Two objects with identical payload bytes therefore collide to
//! the same id regardless of logical type; callers must not store the same
//! bytes under two different types.
//!
//! Objects are immutable: created once on write, never mutated, never
//! deleted. Re-putting an identical payload is a no-op success.

use std::fs;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::types::{ObjectType, Oid};

/// Errors from object store operations.
#[derive(Debug, Error)]
pub enum ObjectError {
    /// No record exists for the requested id.
    #[error("object not found: {oid}")]
    NotFound { oid: Oid },

    /// The stored type tag disagrees with the caller's expectation.
    /// Indicates caller or data-model misuse; never retried.
    #[error("type mismatch for {oid}: expected {expected}, found {actual}")]
    TypeMismatch {
        oid: Oid,
        expected: ObjectType,
        actual: ObjectType,
    },

    /// The record is missing its NUL separator or carries an unknown tag.
    #[error("corrupt object record: {oid}")]
    Corrupt { oid: Oid },

    #[error("object store I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

/// Content-addressed byte storage with type tags.
#[derive(Debug, Clone)]
pub struct ObjectStore {
    dir: PathBuf,
}

impl ObjectStore {
    /// Create a store rooted at an objects directory.
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn object_path(&self, oid: &Oid) -> PathBuf {
        self.dir.join(oid.as_str())
    }

    /// Store a payload under its content hash.
    ///
    /// The hash covers the payload only; the type tag is prepended to the
    /// stored record but does not influence the id. Idempotent: if a record
    /// already exists for the id, nothing is written.
    pub fn put(&self, payload: &[u8], object_type: ObjectType) -> Result<Oid, ObjectError> {
        let oid = Oid::for_bytes(payload);
        let path = self.object_path(&oid);
        if !path.exists() {
            let mut record = Vec::with_capacity(object_type.as_str().len() + 1 + payload.len());
            record.extend_from_slice(object_type.as_str().as_bytes());
            record.push(0);
            record.extend_from_slice(payload);
            fs::write(&path, record)?;
        }
        Ok(oid)
    }

    /// Read a payload by id.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no record exists for `oid`
    /// - `TypeMismatch` if `expected` is given and differs from the stored tag
    /// - `Corrupt` if the record has no NUL separator or an unknown tag
    pub fn get(&self, oid: &Oid, expected: Option<ObjectType>) -> Result<Vec<u8>, ObjectError> {
        let record = match fs::read(self.object_path(oid)) {
            Ok(record) => record,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(ObjectError::NotFound { oid: oid.clone() });
            }
            Err(err) => return Err(err.into()),
        };

        let sep = record
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| ObjectError::Corrupt { oid: oid.clone() })?;
        let tag = std::str::from_utf8(&record[..sep])
            .ok()
            .and_then(ObjectType::parse)
            .ok_or_else(|| ObjectError::Corrupt { oid: oid.clone() })?;

        if let Some(expected) = expected {
            if tag != expected {
                return Err(ObjectError::TypeMismatch {
                    oid: oid.clone(),
                    expected,
                    actual: tag,
                });
            }
        }
        Ok(record[sep + 1..].to_vec())
    }

    /// Check whether a record exists for an id.
    pub fn contains(&self, oid: &Oid) -> bool {
        self.object_path(oid).exists()
    }

    /// Copy a raw record into another store, preserving tag and payload.
    ///
    /// Used by same-host fetch. A no-op if the destination already holds the
    /// object.
    pub fn copy_to(&self, oid: &Oid, dest: &ObjectStore) -> Result<(), ObjectError> {
        if dest.contains(oid) {
            return Ok(());
        }
        let src = self.object_path(oid);
        if !src.exists() {
            return Err(ObjectError::NotFound { oid: oid.clone() });
        }
        fs::copy(src, dest.object_path(oid))?;
        Ok(())
    }
}
