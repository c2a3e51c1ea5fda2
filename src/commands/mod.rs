//! Command implementations behind the `fsnap` subcommands.
//!
//! Each command takes the [`crate::SnapshotContext`] explicitly. Rendering is
//! split from execution where output is non-trivial, so the text can be written
//! to any [`std::io::Write`] sink.

/// `fsnap diff`
pub mod diff;
/// `fsnap list`
pub mod list;
/// `fsnap scan`
pub mod scan;
/// `fsnap show`
pub mod show;
