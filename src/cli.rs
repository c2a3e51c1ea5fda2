//! Command-line interface definitions for fsnap.
//!
//! The CLI definitions are shared between the main binary and build tools
//! (like xtask) for man page generation.
//!
//! Note: Field-level documentation is provided via clap attributes (#[arg(help = "...")]),
//! so we allow missing_docs for this module to avoid redundant documentation.

#![allow(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Main CLI structure for fsnap.
#[derive(Parser)]
#[command(
    name = "fsnap",
    version = crate::VERSION,
    about = "Create deterministic filesystem manifests and diff them",
    long_about = "Records the files of a directory tree (path, size, modification time) as named \
                  snapshots and reports what was added, deleted or changed between two snapshots"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Directory where snapshots are stored
    #[arg(long, global = true, env = "FSNAP_STORE_PATH", value_name = "DIR")]
    pub store: Option<PathBuf>,
}

/// All available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Scan a directory and save its manifest as a snapshot
    Scan {
        /// Directory to scan
        path: String,

        /// Snapshot name (defaults to snapshot-YYYYMMDD-HHMMSS)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// List saved snapshots
    List {
        /// Also show scan time, file count and scanned directory
        #[arg(short, long)]
        long: bool,
    },

    /// Show the contents of a snapshot
    Show {
        /// Snapshot name
        name: String,

        /// Print the stored JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Compare two snapshots
    Diff {
        /// Older snapshot
        from: String,

        /// Newer snapshot
        to: String,

        /// Also list unchanged files
        #[arg(short, long)]
        unchanged: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
