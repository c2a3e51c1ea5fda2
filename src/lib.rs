#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
// Allow pedantic strict lints that create false positives in this codebase
#![allow(clippy::arithmetic_side_effects)] // Simple counters and size sums cannot overflow
#![allow(clippy::float_arithmetic)] // Required for mtime conversion and size formatting
#![allow(clippy::indexing_slicing)] // Bounds checked by logic

//! # fsnap - Deterministic Filesystem Snapshots
//!
//! fsnap records point-in-time inventories of a directory tree (path, size and
//! modification time of every regular file), stores them as named snapshots, and
//! compares two snapshots to report added, deleted, changed and unchanged files.
//!
//! ## Features
//!
//! - **Canonical Manifests**: Files sorted by POSIX relative path, so two scans of an
//!   unchanged tree serialize identically apart from the creation time
//! - **Fault-Tolerant Traversal**: Unreadable directories and files are logged and
//!   skipped; only an invalid root aborts a scan
//! - **Set-Based Diffs**: Every path lands in exactly one of added, deleted, changed
//!   or unchanged
//! - **Portable Format**: Snapshots are plain, indented JSON
//!
//! ## Architecture
//!
//! - [`snapshot`]: File records, manifests and the directory scanner
//! - [`diff`]: Manifest comparison
//! - [`storage`]: Named snapshot persistence
//! - [`commands`]: Command implementations (scan, list, show, diff)
//! - [`config`]: Configuration parsing and validation
//! - [`output`]: Output styling and logging setup
//! - [`utils`]: Utility functions and helpers
//!
//! ## Example Usage
//!
//! ```no_run
//! use fsnap::storage::SnapshotStore;
//! use std::path::{Path, PathBuf};
//!
//! # fn main() -> anyhow::Result<()> {
//! let store = SnapshotStore::new(PathBuf::from("/tmp/fsnap-store"));
//!
//! let before = fsnap::snapshot::scan(Path::new("/srv/data"))?;
//! store.save_manifest(&before, "before")?;
//!
//! // ... files change ...
//!
//! let after = fsnap::snapshot::scan(Path::new("/srv/data"))?;
//! let report = fsnap::diff::diff(&store.load_manifest("before")?, &after);
//! println!("{} changed", report.changed.len());
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions (argument parsing structures).
pub mod cli;

/// Commands module containing all CLI command implementations.
pub mod commands;

/// Configuration parsing, validation, and management.
pub mod config;

/// Comparison of two manifests.
pub mod diff;

/// Error types for the library layer.
pub mod error;

/// Output formatting and logging setup.
pub mod output;

/// File records, manifests and the directory scanner.
pub mod snapshot;

/// Named snapshot storage.
pub mod storage;

/// Utility functions and helpers.
pub mod utils;

use anyhow::{Context, Result};
use std::path::PathBuf;

pub use error::SnapshotError;

/// Current version of the fsnap binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default snapshot store directory name within the home directory.
pub const DEFAULT_STORE_DIR: &str = ".safe-fs-snapshot";

/// Default configuration file path relative to home directory.
pub const DEFAULT_CONFIG_PATH: &str = ".config/fsnap/config.toml";

/// Central context for all fsnap commands.
///
/// Holds the loaded configuration and the snapshot store it resolves to.
/// Commands receive it explicitly; there is no process-wide store location.
///
/// # Examples
///
/// ```no_run
/// use fsnap::SnapshotContext;
///
/// # fn main() -> anyhow::Result<()> {
/// // Context from the default config file
/// let ctx = SnapshotContext::new(None)?;
///
/// // Context with explicit paths (for testing)
/// let ctx = SnapshotContext::new_explicit(
///     "/tmp/test_store".into(),
///     "/tmp/test_config.toml".into(),
/// )?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SnapshotContext {
    /// Path to the configuration file.
    pub config_path: PathBuf,

    /// Loaded configuration settings.
    pub config: config::Config,

    /// Store holding named snapshots.
    pub store: storage::SnapshotStore,
}

impl SnapshotContext {
    /// Creates a context from the default (or `FSNAP_CONFIG_PATH`) config file.
    ///
    /// `store_override` (from `--store` or `FSNAP_STORE_PATH`) takes precedence over
    /// `core.store_path` from the configuration.
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined or the
    /// configuration file cannot be read or parsed.
    pub fn new(store_override: Option<PathBuf>) -> Result<Self> {
        let config_path = if let Ok(path) = std::env::var("FSNAP_CONFIG_PATH") {
            PathBuf::from(path)
        } else {
            let home = dirs::home_dir().context("Could not find home directory")?;
            home.join(DEFAULT_CONFIG_PATH)
        };

        let config = config::Config::load(&config_path)?;

        let store_path = match store_override {
            Some(path) => utils::expand_tilde(&path.to_string_lossy())?,
            None => config.resolved_store_path()?,
        };

        Ok(Self {
            config_path,
            config,
            store: storage::SnapshotStore::new(store_path),
        })
    }

    /// Creates a context with explicit store and config paths.
    ///
    /// The configuration is read from `config_path` if it exists, but the store
    /// path always comes from `store_path`.
    ///
    /// # Errors
    /// Returns an error if an existing configuration file cannot be parsed.
    pub fn new_explicit(store_path: PathBuf, config_path: PathBuf) -> Result<Self> {
        let mut config = config::Config::load(&config_path)?;
        config.core.store_path.clone_from(&store_path);

        Ok(Self {
            config_path,
            config,
            store: storage::SnapshotStore::new(store_path),
        })
    }
}
