//! log command - Walk and print commit history

use anyhow::Result;

use crate::cli::Context;
use crate::codec::read_commit;

/// Print history reachable from a revision, newest first.
pub fn log(ctx: &Context, revision: &str) -> Result<()> {
    let repo = super::open_repo(ctx)?;
    let start = repo.resolve_revision(revision)?;
    let decorations = super::refs_by_oid(&repo)?;

    for oid in repo.graph().ancestors([start]) {
        let oid = oid?;
        let commit = read_commit(repo.objects(), &oid)?;

        match decorations.get(&oid) {
            Some(names) => println!("commit {} ({})", oid, names.join(", ")),
            None => println!("commit {}", oid),
        }
        for line in commit.message.lines() {
            println!("    {}", line);
        }
        println!();
    }
    Ok(())
}
