//! add command - Stage files or directories

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::Context;
use crate::ui::output;

/// Stage paths into the index.
pub fn add(ctx: &Context, paths: &[PathBuf]) -> Result<()> {
    let repo = super::open_repo(ctx)?;
    repo.add(paths)?;
    output::debug(format!("staged {} path argument(s)", paths.len()), ctx.verbosity());
    Ok(())
}
