use crate::diff::FileChange;
use chrono::{DateTime, FixedOffset, Local, TimeZone};
use colored::Colorize;
use std::fmt;

/// Classification of a path in a snapshot comparison, for formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// Path only exists in the newer snapshot
    Added,
    /// Path only exists in the older snapshot
    Deleted,
    /// Path exists in both with different size or mtime
    Changed,
    /// Path exists in both, identical
    Unchanged,
}

impl FileStatus {
    /// Returns the status character used in short format
    #[must_use]
    pub const fn short_char(&self) -> char {
        match self {
            Self::Added => 'A',
            Self::Deleted => 'D',
            Self::Changed => 'M',
            Self::Unchanged => '=',
        }
    }

    /// Returns the colored status character
    #[must_use]
    pub fn colored_char(&self) -> String {
        let c = self.short_char().to_string();
        match self {
            Self::Added => c.green().to_string(),
            Self::Deleted => c.red().to_string(),
            Self::Changed => c.yellow().to_string(),
            Self::Unchanged => c.bright_black().to_string(),
        }
    }

    /// Returns the full status name
    #[must_use]
    pub const fn name(&self) -> &str {
        match self {
            Self::Added => "added",
            Self::Deleted => "deleted",
            Self::Changed => "changed",
            Self::Unchanged => "unchanged",
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Display status for one entry of [`crate::diff::DiffReport::changes`].
impl From<FileChange<'_>> for FileStatus {
    fn from(change: FileChange<'_>) -> Self {
        match change {
            FileChange::Added(_) => Self::Added,
            FileChange::Deleted(_) => Self::Deleted,
            FileChange::Changed(_) => Self::Changed,
        }
    }
}

/// Formats a file path with its status
#[must_use]
pub fn format_file_status(status: FileStatus, path: &str) -> String {
    format!("{} {path}", status.colored_char())
}

/// Formats bytes into human-readable size
#[must_use]
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    #[allow(clippy::cast_precision_loss)]
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{bytes} {}", UNITS[unit_index])
    } else {
        format!("{size:.2} {}", UNITS[unit_index])
    }
}

/// Formats a snapshot creation time in local time
#[must_use]
pub fn format_timestamp(timestamp: &DateTime<FixedOffset>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Formats a file mtime (fractional epoch seconds) in local time
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn format_mtime(mtime: f64) -> String {
    let secs = mtime.floor();
    let nanos = ((mtime - secs) * 1e9) as u32;
    Local
        .timestamp_opt(secs as i64, nanos.min(999_999_999))
        .single()
        .map_or_else(
            || format!("Invalid timestamp: {mtime}"),
            |dt| dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        )
}

/// Formats a relative time from now
#[must_use]
pub fn format_relative_time(timestamp: &DateTime<FixedOffset>) -> String {
    let diff = Local::now().timestamp() - timestamp.timestamp();

    if diff < 0 {
        return "in the future".to_string();
    }

    let (value, unit) = if diff < 60 {
        (diff, "second")
    } else if diff < 3600 {
        (diff / 60, "minute")
    } else if diff < 86400 {
        (diff / 3600, "hour")
    } else if diff < 2_592_000 {
        (diff / 86400, "day")
    } else if diff < 31_536_000 {
        (diff / 2_592_000, "month")
    } else {
        (diff / 31_536_000, "year")
    };

    if value == 1 {
        format!("{value} {unit} ago")
    } else {
        format!("{value} {unit}s ago")
    }
}

/// Formats a size transition such as `10 B -> 15 B (+5 B)`
#[must_use]
pub fn format_size_change(before: u64, after: u64) -> String {
    let delta = if after >= before {
        format!("+{}", format_size(after - before))
    } else {
        format!("-{}", format_size(before - after))
    };
    format!("{} -> {} ({delta})", format_size(before), format_size(after))
}
