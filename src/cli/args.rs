//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Verbose diagnostic output
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Vellum - a minimal content-addressable version control engine
#[derive(Parser, Debug)]
#[command(name = "vellum")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if vellum was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Verbose diagnostic output
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an empty repository in the current directory
    #[command(
        name = "init",
        long_about = "Create an empty vellum repository in the current directory.\n\n\
            Writes the .vellum control directory with an empty object store, a \
            default configuration, and a HEAD aimed at the default branch. The \
            branch itself is created by the first commit."
    )]
    Init,

    /// Stage files or directories for the next commit
    #[command(
        name = "add",
        long_about = "Stage files or directories into the index.\n\n\
            File arguments are hashed and staged individually. Directory \
            arguments are walked recursively; control and tooling directories \
            are skipped."
    )]
    Add {
        /// Files or directories to stage
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Record the staged snapshot as a new commit
    #[command(
        name = "commit",
        long_about = "Record the staged index as a commit and advance HEAD.\n\n\
            The current HEAD commit becomes the first parent. When a merge is \
            in progress the incoming commit becomes the second parent, which \
            concludes the merge."
    )]
    Commit {
        /// Commit message
        #[arg(short, long)]
        message: String,

        /// Stage all working-tree changes before committing
        #[arg(short, long)]
        all: bool,
    },

    /// Show branch, merge, staged, and unstaged state
    Status,

    /// Walk and print commit history
    #[command(
        name = "log",
        long_about = "Print the commit history reachable from a revision.\n\n\
            Commits are shown newest-first along first-parent chains, with any \
            references pointing at each commit shown alongside it."
    )]
    Log {
        /// Revision to start from (defaults to HEAD)
        #[arg(default_value = "@")]
        revision: String,
    },

    /// Show a commit and its changes
    Show {
        /// Revision to show (defaults to HEAD)
        #[arg(default_value = "@")]
        revision: String,
    },

    /// Show changes between trees
    #[command(
        name = "diff",
        long_about = "Show changes as a unified diff.\n\n\
            By default compares the staging index against the working tree. \
            With --cached, compares HEAD against the index. With a revision, \
            compares that commit's tree against the index or working tree."
    )]
    Diff {
        /// Revision to compare against
        revision: Option<String>,

        /// Compare against the staging index instead of the working tree
        #[arg(long)]
        cached: bool,
    },

    /// Materialize a revision and move HEAD
    #[command(
        name = "checkout",
        long_about = "Replace the working tree with a revision's snapshot.\n\n\
            When the revision names a branch, HEAD follows the branch; any \
            other revision detaches HEAD at that commit."
    )]
    Checkout {
        /// Branch, tag, or commit to check out
        revision: String,
    },

    /// List branches or create a new one
    Branch {
        /// Name for the new branch (lists branches when omitted)
        name: Option<String>,

        /// Commit the new branch starts at (defaults to HEAD)
        #[arg(default_value = "@")]
        start: String,
    },

    /// Create a tag pointing at a commit
    Tag {
        /// Name for the tag
        name: String,

        /// Commit to tag (defaults to HEAD)
        #[arg(default_value = "@")]
        revision: String,
    },

    /// Merge a revision into the current branch
    #[command(
        name = "merge",
        long_about = "Merge a revision into the current HEAD.\n\n\
            Fast-forwards when possible, creating no commit. Otherwise the \
            merged tree is materialized into the working area with any \
            conflicts marked, and 'vellum commit' concludes the merge with a \
            two-parent commit."
    )]
    Merge {
        /// Revision to merge
        revision: String,
    },

    /// Print the best common ancestor of two commits
    #[command(name = "merge-base")]
    MergeBase {
        /// First revision
        first: String,

        /// Second revision
        second: String,
    },

    /// Move the current branch to a commit
    Reset {
        /// Revision to reset to
        revision: String,
    },

    /// Copy refs and objects from another repository
    #[command(
        name = "fetch",
        long_about = "Copy branch refs and the objects they reach from another \
            repository on this host.\n\n\
            Remote branches land under refs/remote/ and never move local \
            branches."
    )]
    Fetch {
        /// Path to the remote repository's working directory
        remote: PathBuf,
    },

    /// Print the commit and ref graph in DOT format
    #[command(
        name = "graph",
        after_help = "\
EXAMPLES:
    # Render the graph with graphviz
    vellum graph | dot -Tpng -o graph.png"
    )]
    Graph,

    /// Store a file as a blob object and print its id
    #[command(name = "hash-object")]
    HashObject {
        /// File to hash
        file: PathBuf,
    },

    /// Print the raw payload of an object
    #[command(name = "cat-file")]
    CatFile {
        /// Object id or revision
        object: String,
    },

    /// Snapshot the working tree into tree objects and print the root id
    #[command(name = "write-tree")]
    WriteTree,

    /// Replace the working tree with a stored tree
    #[command(
        name = "read-tree",
        long_about = "Materialize a stored tree into the working directory.\n\n\
            HEAD and the staging index are untouched."
    )]
    ReadTree {
        /// Tree object id
        tree: String,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
