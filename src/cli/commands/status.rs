//! status command - Show branch, merge, staged, and unstaged state

use anyhow::Result;

use crate::cli::Context;

/// Show a summary of repository state.
pub fn status(ctx: &Context) -> Result<()> {
    let repo = super::open_repo(ctx)?;
    let status = repo.status()?;

    match (&status.branch, &status.head) {
        (Some(branch), _) => println!("On branch {}", branch),
        (None, Some(head)) => println!("HEAD detached at {}", head.short(7)),
        (None, None) => println!("No commits yet"),
    }
    if status.merge_in_progress {
        println!("Merge in progress; conclude with 'vellum commit'");
    }

    if !status.staged.is_empty() {
        println!("\nChanges to be committed:");
        for (path, kind) in &status.staged {
            println!("    {}: {}", kind, path);
        }
    }
    if !status.unstaged.is_empty() {
        println!("\nChanges not staged:");
        for (path, kind) in &status.unstaged {
            println!("    {}: {}", kind, path);
        }
    }
    Ok(())
}
