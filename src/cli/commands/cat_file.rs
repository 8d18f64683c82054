//! cat-file command - Print an object's raw payload

use std::io::Write;

use anyhow::Result;

use crate::cli::Context;

/// Print the payload of an object, whatever its type.
pub fn cat_file(ctx: &Context, object: &str) -> Result<()> {
    let repo = super::open_repo(ctx)?;
    let oid = repo.resolve_revision(object)?;
    let payload = repo.objects().get(&oid, None)?;
    std::io::stdout().write_all(&payload)?;
    Ok(())
}
