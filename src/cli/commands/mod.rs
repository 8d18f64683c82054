//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Drives the repository handle to execute the command
//! 3. Formats and displays output
//!
//! Handlers do NOT touch the stores directly.

mod add;
mod branch;
mod cat_file;
mod checkout;
mod commit;
mod completion;
mod diff_cmd;
mod fetch;
mod graph_cmd;
mod hash_object;
mod init;
mod log_cmd;
mod merge;
mod merge_base;
mod read_tree;
mod reset;
mod show;
mod status;
mod tag;
mod write_tree;

// Re-export command functions for testing and direct invocation
pub use add::add;
pub use branch::branch;
pub use cat_file::cat_file;
pub use checkout::checkout;
pub use commit::commit;
pub use completion::completion;
pub use diff_cmd::diff;
pub use fetch::fetch;
pub use graph_cmd::graph;
pub use hash_object::hash_object;
pub use init::init;
pub use log_cmd::log;
pub use merge::merge;
pub use merge_base::merge_base;
pub use read_tree::read_tree;
pub use reset::reset;
pub use show::show;
pub use status::status;
pub use tag::tag;
pub use write_tree::write_tree;

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::cli::args::Command;
use crate::cli::Context;
use crate::core::types::Oid;
use crate::repo::Repository;
use crate::store::RefValue;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Init => init::init(ctx),
        Command::Add { paths } => add::add(ctx, &paths),
        Command::Commit { message, all } => commit::commit(ctx, &message, all),
        Command::Status => status::status(ctx),
        Command::Log { revision } => log_cmd::log(ctx, &revision),
        Command::Show { revision } => show::show(ctx, &revision),
        Command::Diff { revision, cached } => diff_cmd::diff(ctx, revision.as_deref(), cached),
        Command::Checkout { revision } => checkout::checkout(ctx, &revision),
        Command::Branch { name, start } => branch::branch(ctx, name.as_deref(), &start),
        Command::Tag { name, revision } => tag::tag(ctx, &name, &revision),
        Command::Merge { revision } => merge::merge(ctx, &revision),
        Command::MergeBase { first, second } => merge_base::merge_base(ctx, &first, &second),
        Command::Reset { revision } => reset::reset(ctx, &revision),
        Command::Fetch { remote } => fetch::fetch(ctx, &remote),
        Command::Graph => graph_cmd::graph(ctx),
        Command::HashObject { file } => hash_object::hash_object(ctx, &file),
        Command::CatFile { object } => cat_file::cat_file(ctx, &object),
        Command::WriteTree => write_tree::write_tree(ctx),
        Command::ReadTree { tree } => read_tree::read_tree(ctx, &tree),
        Command::Completion { shell } => completion::completion(shell),
    }
}

/// The directory the command runs in.
fn working_dir(ctx: &Context) -> Result<PathBuf> {
    match &ctx.cwd {
        Some(path) => Ok(path.clone()),
        None => std::env::current_dir().context("failed to determine current directory"),
    }
}

/// Open the repository containing the working directory.
fn open_repo(ctx: &Context) -> Result<Repository> {
    let cwd = working_dir(ctx)?;
    Ok(Repository::open(&cwd)?)
}

/// All references grouped by the commit they point at, for log decoration.
fn refs_by_oid(repo: &Repository) -> Result<HashMap<Oid, Vec<String>>> {
    let mut out: HashMap<Oid, Vec<String>> = HashMap::new();
    for (name, value) in repo.refs().iter("")? {
        if let RefValue::Direct(oid) = value {
            out.entry(oid).or_default().push(name);
        }
    }
    Ok(out)
}
