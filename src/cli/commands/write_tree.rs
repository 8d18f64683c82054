//! write-tree command - Snapshot the working tree and print the root id

use anyhow::Result;

use crate::cli::Context;

/// Snapshot the working directory into tree objects and print the root id.
pub fn write_tree(ctx: &Context) -> Result<()> {
    let repo = super::open_repo(ctx)?;
    let tree = repo.materializer().snapshot_worktree()?;
    println!("{}", tree);
    Ok(())
}
