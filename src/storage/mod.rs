/// Snapshot persistence
pub mod snapshots;

pub use snapshots::SnapshotStore;

use crate::error::{Result, SnapshotError};
use crate::snapshot::Manifest;
use chrono::{DateTime, FixedOffset};

/// File extension of stored snapshots.
pub const SNAPSHOT_EXTENSION: &str = "json";

/// Header information about one stored snapshot, for listings.
#[derive(Debug, Clone)]
pub struct SnapshotSummary {
    /// Snapshot name
    pub name: String,
    /// Directory that was scanned
    pub scanned_directory: String,
    /// When the scan ran
    pub created_at: DateTime<FixedOffset>,
    /// Number of files recorded
    pub files_count: usize,
    /// Sum of all file sizes in bytes
    pub total_size: u64,
}

impl SnapshotSummary {
    fn new(name: String, manifest: &Manifest) -> Self {
        Self {
            name,
            scanned_directory: manifest.scanned_directory().to_string(),
            created_at: manifest.created_at(),
            files_count: manifest.files_count(),
            total_size: manifest.total_size(),
        }
    }
}

/// Checks that `name` can safely be used as a snapshot file stem.
///
/// # Errors
///
/// Returns [`SnapshotError::InvalidName`] if the name:
/// - Is empty
/// - Starts with `.` (this also covers `.` and `..`)
/// - Contains `/`, `\` or a NUL byte
pub fn validate_name(name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        "name is empty"
    } else if name.starts_with('.') {
        "name must not start with '.'"
    } else if name.contains(['/', '\\']) {
        "name must not contain path separators"
    } else if name.contains('\0') {
        "name must not contain NUL"
    } else {
        return Ok(());
    };

    Err(SnapshotError::InvalidName {
        name: name.to_string(),
        reason,
    })
}

/// Default name for a snapshot taken at `now`: `snapshot-YYYYMMDD-HHMMSS`.
#[must_use]
pub fn default_snapshot_name<Tz: chrono::TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("snapshot-{}", now.format("%Y%m%d-%H%M%S"))
}
