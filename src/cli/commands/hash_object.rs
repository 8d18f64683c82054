//! hash-object command - Store a file as a blob and print its id

use std::path::Path;

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::core::types::ObjectType;

/// Hash a file into the object store and print the resulting id.
pub fn hash_object(ctx: &Context, file: &Path) -> Result<()> {
    let repo = super::open_repo(ctx)?;
    let abs = if file.is_absolute() {
        file.to_path_buf()
    } else {
        super::working_dir(ctx)?.join(file)
    };
    let payload =
        std::fs::read(&abs).with_context(|| format!("failed to read {}", abs.display()))?;
    let oid = repo.objects().put(&payload, ObjectType::Blob)?;
    println!("{}", oid);
    Ok(())
}
