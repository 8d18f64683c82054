//! init command - Create an empty repository

use anyhow::Result;

use crate::cli::Context;
use crate::repo::Repository;
use crate::ui::output;

/// Create an empty repository in the working directory.
pub fn init(ctx: &Context) -> Result<()> {
    let cwd = super::working_dir(ctx)?;
    let repo = Repository::init(&cwd)?;
    output::print(
        format!(
            "Initialized empty vellum repository in {}",
            repo.paths().control_dir().display()
        ),
        ctx.verbosity(),
    );
    Ok(())
}
