//! graph command - Print the commit and ref graph in DOT format

use std::collections::BTreeSet;

use anyhow::Result;

use crate::cli::Context;
use crate::codec::read_commit;
use crate::core::types::Oid;
use crate::store::RefValue;

/// Print a graphviz rendering of every ref and the commits they reach.
pub fn graph(ctx: &Context) -> Result<()> {
    let repo = super::open_repo(ctx)?;

    let mut tips: Vec<(String, Oid)> = Vec::new();
    for (name, value) in repo.refs().iter("")? {
        if let RefValue::Direct(oid) = value {
            tips.push((name, oid));
        }
    }

    println!("digraph commits {{");
    for (name, oid) in &tips {
        println!("  \"{}\" [shape=note]", name);
        println!("  \"{}\" -> \"{}\"", name, oid);
    }

    let mut commits: BTreeSet<Oid> = BTreeSet::new();
    for (_, tip) in &tips {
        for oid in repo.graph().ancestors([tip.clone()]) {
            commits.insert(oid?);
        }
    }
    for oid in &commits {
        let commit = read_commit(repo.objects(), oid)?;
        println!("  \"{}\" [shape=box, label=\"{}\"]", oid, oid.short(10));
        for parent in &commit.parents {
            println!("  \"{}\" -> \"{}\"", oid, parent);
        }
    }
    println!("}}");
    Ok(())
}
