//! read-tree command - Materialize a stored tree into the working directory

use anyhow::Result;

use crate::cli::Context;

/// Replace the working directory contents with a stored tree.
///
/// HEAD and the staging index are untouched; this is the raw tree-to-disk
/// operation `checkout` builds on.
pub fn read_tree(ctx: &Context, tree: &str) -> Result<()> {
    let repo = super::open_repo(ctx)?;
    let oid = repo.resolve_revision(tree)?;
    repo.materializer().materialize(&oid)?;
    Ok(())
}
