//! tag command - Create a tag pointing at a commit

use anyhow::Result;

use crate::cli::Context;
use crate::ui::output;

/// Create a tag.
pub fn tag(ctx: &Context, name: &str, revision: &str) -> Result<()> {
    let repo = super::open_repo(ctx)?;
    let target = repo.resolve_revision(revision)?;
    repo.create_tag(name, &target)?;
    output::print(
        format!("Tag '{}' created at {}", name, target.short(7)),
        ctx.verbosity(),
    );
    Ok(())
}
