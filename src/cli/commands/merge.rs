//! merge command - Merge a revision into the current branch

use anyhow::Result;

use crate::cli::Context;
use crate::repo::MergeOutcome;
use crate::ui::output;

/// Merge a revision into HEAD.
pub fn merge(ctx: &Context, revision: &str) -> Result<()> {
    let repo = super::open_repo(ctx)?;
    match repo.merge(revision)? {
        MergeOutcome::FastForward { tip } => {
            output::print(
                format!("Fast-forwarded to {}", tip.short(7)),
                ctx.verbosity(),
            );
        }
        MergeOutcome::Merged { conflicts } if conflicts.is_empty() => {
            output::print(
                "Merged cleanly; conclude with 'vellum commit'",
                ctx.verbosity(),
            );
        }
        MergeOutcome::Merged { conflicts } => {
            for path in &conflicts {
                output::warn(format!("conflict in {}", path), ctx.verbosity());
            }
            output::print(
                "Merge left conflicts; resolve them, then 'vellum commit'",
                ctx.verbosity(),
            );
        }
    }
    Ok(())
}
