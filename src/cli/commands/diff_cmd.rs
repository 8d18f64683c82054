//! diff command - Show changes between trees

use std::io::Write;

use anyhow::Result;

use crate::cli::Context;
use crate::codec::{read_commit, read_tree};
use crate::merge::diff_output;

/// Show a unified diff.
///
/// Without arguments, compares the index against the working tree. With
/// `--cached`, compares HEAD against the index. A revision replaces the
/// "from" side with that commit's tree.
pub fn diff(ctx: &Context, revision: Option<&str>, cached: bool) -> Result<()> {
    let repo = super::open_repo(ctx)?;
    let index = repo.index()?;

    let from = match revision {
        Some(rev) => {
            let oid = repo.resolve_revision(rev)?;
            let commit = read_commit(repo.objects(), &oid)?;
            read_tree(repo.objects(), &commit.tree)?
        }
        None if cached => repo.head_tree()?,
        None => index.entries().clone(),
    };
    let to = if cached {
        index.entries().clone()
    } else {
        // Store-backed: the diff below loads both sides by id.
        repo.materializer().store_working_map()?
    };

    let out = diff_output(repo.objects(), &repo.config().diff_tool, &from, &to)?;
    std::io::stdout().write_all(&out)?;
    Ok(())
}
