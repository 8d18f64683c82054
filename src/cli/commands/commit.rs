//! commit command - Record the staged snapshot

use anyhow::Result;

use crate::cli::Context;
use crate::ui::output;

/// Record the staged index as a commit.
pub fn commit(ctx: &Context, message: &str, all: bool) -> Result<()> {
    let repo = super::open_repo(ctx)?;
    if all {
        // Stage the whole working tree before committing.
        repo.add(&[repo.paths().work_dir().to_path_buf()])?;
    }
    let oid = repo.commit(message)?;
    output::print(format!("[{}] {}", oid.short(7), message), ctx.verbosity());
    Ok(())
}
