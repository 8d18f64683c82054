//! merge-base command - Print the best common ancestor of two commits

use anyhow::Result;

use crate::cli::Context;

/// Print the merge base of two revisions.
pub fn merge_base(ctx: &Context, first: &str, second: &str) -> Result<()> {
    let repo = super::open_repo(ctx)?;
    let first = repo.resolve_revision(first)?;
    let second = repo.resolve_revision(second)?;
    let base = repo.graph().merge_base(&first, &second)?;
    println!("{}", base);
    Ok(())
}
