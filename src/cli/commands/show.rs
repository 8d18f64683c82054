//! show command - Show a commit and its changes

use std::io::Write;

use anyhow::Result;

use crate::cli::Context;
use crate::codec::tree::TreeMap;
use crate::codec::{read_commit, read_tree};
use crate::merge::diff_output;

/// Show a commit header and its diff against the first parent.
pub fn show(ctx: &Context, revision: &str) -> Result<()> {
    let repo = super::open_repo(ctx)?;
    let oid = repo.resolve_revision(revision)?;
    let commit = read_commit(repo.objects(), &oid)?;

    println!("commit {}", oid);
    for line in commit.message.lines() {
        println!("    {}", line);
    }
    println!();

    let parent_tree = match commit.first_parent() {
        Some(parent) => {
            let parent_commit = read_commit(repo.objects(), parent)?;
            read_tree(repo.objects(), &parent_commit.tree)?
        }
        None => TreeMap::new(),
    };
    let tree = read_tree(repo.objects(), &commit.tree)?;

    let diff = diff_output(
        repo.objects(),
        &repo.config().diff_tool,
        &parent_tree,
        &tree,
    )?;
    std::io::stdout().write_all(&diff)?;
    Ok(())
}
