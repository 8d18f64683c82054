//! fetch command - Copy refs and objects from another repository

use std::path::Path;

use anyhow::Result;

use crate::cli::Context;
use crate::ui::output;

/// Fetch branches from a repository on this host.
pub fn fetch(ctx: &Context, remote: &Path) -> Result<()> {
    let repo = super::open_repo(ctx)?;
    let copied = repo.fetch(remote)?;
    for (name, oid) in &copied {
        output::print(format!("{} -> {}", oid.short(7), name), ctx.verbosity());
    }
    if copied.is_empty() {
        output::print("Nothing to fetch", ctx.verbosity());
    }
    Ok(())
}
