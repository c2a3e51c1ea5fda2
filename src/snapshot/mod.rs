//! Snapshot engine: manifests and the directory scanner that builds them.
//!
//! # Architecture
//!
//! - [`crate::snapshot::Manifest`] - sorted, immutable list of [`FileRecord`]s plus metadata
//! - [`crate::snapshot::Scanner`] - walks a root directory and produces a manifest
//!
//! # Usage
//!
//! ```no_run
//! use fsnap::snapshot::Scanner;
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let outcome = Scanner::new(Path::new("/home/user/photos"))?.run();
//! for skipped in &outcome.skipped {
//!     eprintln!("{skipped}");
//! }
//! println!("{} files", outcome.manifest.files_count());
//! # Ok(())
//! # }
//! ```

pub mod record;
pub mod scanner;

pub use record::{FileRecord, Manifest};
pub use scanner::{ScanOutcome, Scanner, scan};
