//! Error types for scanning, diffing and snapshot storage.
//!
//! Only [`SnapshotError`] ever escapes to a caller. Per-entry traversal
//! failures are [`EntryReadError`] values collected by the scanner and
//! reported as warnings; they never abort a scan.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used by the library layer.
pub type Result<T, E = SnapshotError> = std::result::Result<T, E>;

/// Why a scan root was rejected.
#[derive(Debug, Error)]
pub enum InvalidRootReason {
    /// Nothing exists at the path.
    #[error("path does not exist")]
    NotFound,
    /// Something exists at the path, but it is not a directory.
    #[error("path is not a directory")]
    NotADirectory,
    /// The path exists but could not be resolved to an absolute path.
    #[error("path could not be resolved: {0}")]
    Unresolvable(#[source] io::Error),
}

/// Errors surfaced by the library to its callers.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The requested scan root does not exist or is not a directory.
    #[error("invalid scan root {}: {reason}", path.display())]
    InvalidRoot {
        /// Path as supplied by the caller.
        path: PathBuf,
        /// What was wrong with it.
        reason: InvalidRootReason,
    },

    /// No snapshot with this name exists in the store.
    #[error("snapshot '{0}' not found")]
    SnapshotNotFound(String),

    /// The snapshot name cannot be used as a store artifact name.
    #[error("invalid snapshot name '{name}': {reason}")]
    InvalidName {
        /// The rejected name.
        name: String,
        /// Which rule it broke.
        reason: &'static str,
    },

    /// A stored snapshot parsed, but breaks a manifest invariant.
    #[error("snapshot '{name}' is corrupt: {reason}")]
    Corrupt {
        /// Snapshot name.
        name: String,
        /// Description of the broken invariant.
        reason: String,
    },

    /// Filesystem failure outside of traversal (store directory, snapshot files).
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// A snapshot file could not be encoded or decoded.
    #[error("invalid snapshot JSON in {}: {source}", path.display())]
    Json {
        /// Snapshot file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}

impl SnapshotError {
    /// Wraps an I/O error together with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Classified cause of a per-entry read failure.
#[derive(Debug, Error)]
pub enum EntryFailure {
    /// The OS refused access.
    #[error("permission denied")]
    PermissionDenied,
    /// The entry disappeared between listing and reading.
    #[error("entry disappeared")]
    Vanished,
    /// The entry name cannot be represented as a UTF-8 relative path.
    #[error("path is not valid UTF-8")]
    NonUtf8Path,
    /// Any other OS-level failure.
    #[error("{0}")]
    Other(#[source] io::Error),
}

impl From<io::Error> for EntryFailure {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            io::ErrorKind::NotFound => Self::Vanished,
            _ => Self::Other(err),
        }
    }
}

/// A directory or file skipped during traversal.
#[derive(Debug, Error)]
pub enum EntryReadError {
    /// The directory could not be enumerated; its whole subtree was skipped.
    #[error("skipped directory {}: {failure}", path.display())]
    Directory {
        /// Absolute directory path.
        path: PathBuf,
        /// Cause.
        #[source]
        failure: EntryFailure,
    },
    /// The file could not be read; only this file was skipped.
    #[error("skipped file {}: {failure}", path.display())]
    File {
        /// Absolute file path.
        path: PathBuf,
        /// Cause.
        #[source]
        failure: EntryFailure,
    },
}

impl EntryReadError {
    /// Builds a directory-level error from any failure convertible to [`EntryFailure`].
    pub fn directory(path: impl Into<PathBuf>, failure: impl Into<EntryFailure>) -> Self {
        Self::Directory {
            path: path.into(),
            failure: failure.into(),
        }
    }

    /// Builds a file-level error from any failure convertible to [`EntryFailure`].
    pub fn file(path: impl Into<PathBuf>, failure: impl Into<EntryFailure>) -> Self {
        Self::File {
            path: path.into(),
            failure: failure.into(),
        }
    }

    /// Path of the skipped entry.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Directory { path, .. } | Self::File { path, .. } => path,
        }
    }

    /// The classified cause.
    #[must_use]
    pub const fn failure(&self) -> &EntryFailure {
        match self {
            Self::Directory { failure, .. } | Self::File { failure, .. } => failure,
        }
    }

    /// Which kind of entry was skipped.
    #[must_use]
    pub const fn kind(&self) -> EntryKind {
        match self {
            Self::Directory { .. } => EntryKind::Directory,
            Self::File { .. } => EntryKind::File,
        }
    }
}

/// Entry kind of a skipped traversal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A directory and its subtree.
    Directory,
    /// A single regular file.
    File,
}
