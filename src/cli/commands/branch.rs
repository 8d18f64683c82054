//! branch command - List branches or create a new one

use anyhow::Result;

use crate::cli::Context;
use crate::ui::output;

/// List branches, or create one pointing at a revision.
pub fn branch(ctx: &Context, name: Option<&str>, start: &str) -> Result<()> {
    let repo = super::open_repo(ctx)?;

    let Some(name) = name else {
        let current = repo.current_branch()?;
        for (branch, _) in repo.branches()? {
            let marker = if Some(branch.as_str()) == current.as_deref() {
                "*"
            } else {
                " "
            };
            println!("{} {}", marker, branch);
        }
        return Ok(());
    };

    let target = repo.resolve_revision(start)?;
    repo.create_branch(name, &target)?;
    output::print(
        format!("Branch '{}' created at {}", name, target.short(7)),
        ctx.verbosity(),
    );
    Ok(())
}
