//! reset command - Move the current branch to a commit

use anyhow::Result;

use crate::cli::Context;
use crate::ui::output;

/// Move HEAD (through its branch) to a revision.
pub fn reset(ctx: &Context, revision: &str) -> Result<()> {
    let repo = super::open_repo(ctx)?;
    let target = repo.resolve_revision(revision)?;
    repo.reset(&target)?;
    output::print(format!("HEAD is now at {}", target.short(7)), ctx.verbosity());
    Ok(())
}
