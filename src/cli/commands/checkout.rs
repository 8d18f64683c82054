//! checkout command - Materialize a revision and move HEAD

use anyhow::Result;

use crate::cli::Context;
use crate::ui::output;

/// Check out a revision.
pub fn checkout(ctx: &Context, revision: &str) -> Result<()> {
    let repo = super::open_repo(ctx)?;
    let oid = repo.checkout(revision)?;
    match repo.current_branch()? {
        Some(branch) => output::print(
            format!("Switched to branch '{}'", branch),
            ctx.verbosity(),
        ),
        None => output::print(
            format!("HEAD detached at {}", oid.short(7)),
            ctx.verbosity(),
        ),
    }
    Ok(())
}
