//! File records and manifests.
//!
//! A [`Manifest`] is the canonical output of one scan: file records sorted
//! ascending by their POSIX-style relative path, with no duplicates. The
//! serialized field names and order are the persisted snapshot format, so
//! they must not change.

use chrono::{DateTime, FixedOffset, Local};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path};
use std::time::{SystemTime, UNIX_EPOCH};

/// One regular file observed during a scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Forward-slash separated path relative to the scan root.
    pub relative_path: String,
    /// Size in bytes.
    pub size: u64,
    /// Modification time in seconds since the Unix epoch.
    pub mtime: f64,
}

impl FileRecord {
    /// Creates a record.
    #[must_use]
    pub fn new(relative_path: impl Into<String>, size: u64, mtime: f64) -> Self {
        Self {
            relative_path: relative_path.into(),
            size,
            mtime,
        }
    }

    /// Whether `other` describes the same file state: equal size and mtime.
    ///
    /// Path equality is the caller's concern; records are compared by key.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn matches(&self, other: &Self) -> bool {
        self.size == other.size && self.mtime == other.mtime
    }
}

/// The result of one scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    scanned_directory: String,
    #[serde(with = "created_at")]
    created_at: DateTime<FixedOffset>,
    files_count: usize,
    files: Vec<FileRecord>,
}

impl Manifest {
    /// Builds a manifest stamped with the current local time.
    ///
    /// `files` are sorted by relative path. Callers must not pass two
    /// records with the same path.
    #[must_use]
    pub fn new(scanned_directory: impl Into<String>, files: Vec<FileRecord>) -> Self {
        Self::with_created_at(scanned_directory, Local::now().fixed_offset(), files)
    }

    /// Builds a manifest with an explicit creation time.
    #[must_use]
    pub fn with_created_at(
        scanned_directory: impl Into<String>,
        created_at: DateTime<FixedOffset>,
        mut files: Vec<FileRecord>,
    ) -> Self {
        files.sort_unstable_by(|a, b| a.relative_path.cmp(&b.relative_path));
        debug_assert!(
            files
                .windows(2)
                .all(|w| w[0].relative_path != w[1].relative_path),
            "duplicate relative path in manifest"
        );

        Self {
            scanned_directory: scanned_directory.into(),
            created_at,
            files_count: files.len(),
            files,
        }
    }

    /// Absolute POSIX path of the scanned directory.
    #[must_use]
    pub fn scanned_directory(&self) -> &str {
        &self.scanned_directory
    }

    /// When the manifest was created.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<FixedOffset> {
        self.created_at
    }

    /// Number of files, as recorded.
    #[must_use]
    pub const fn files_count(&self) -> usize {
        self.files_count
    }

    /// File records in ascending path order.
    #[must_use]
    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    /// Whether the manifest holds no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Looks up a record by relative path.
    #[must_use]
    pub fn get(&self, relative_path: &str) -> Option<&FileRecord> {
        self.files
            .binary_search_by(|f| f.relative_path.as_str().cmp(relative_path))
            .ok()
            .map(|idx| &self.files[idx])
    }

    /// Total size of all files in bytes.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }

    /// Checks the invariants a deserialized manifest must hold.
    ///
    /// # Errors
    ///
    /// Returns a description of the first broken invariant:
    /// - `files_count` differs from the number of records
    /// - records are not strictly ascending by relative path
    pub fn validate(&self) -> Result<(), String> {
        if self.files_count != self.files.len() {
            return Err(format!(
                "files_count is {} but {} files are listed",
                self.files_count,
                self.files.len()
            ));
        }

        if let Some(pair) = self
            .files
            .windows(2)
            .find(|w| w[0].relative_path >= w[1].relative_path)
        {
            return Err(if pair[0].relative_path == pair[1].relative_path {
                format!("duplicate path '{}'", pair[0].relative_path)
            } else {
                format!(
                    "files not sorted: '{}' listed before '{}'",
                    pair[0].relative_path, pair[1].relative_path
                )
            });
        }

        Ok(())
    }
}

/// Joins the normal components of a relative path with `/`.
///
/// Returns `None` when a component is not valid UTF-8, or when the path
/// contains anything other than plain names (root, prefix, `.` or `..`).
#[must_use]
pub fn to_posix_relative(path: &Path) -> Option<String> {
    let mut out = String::new();
    for component in path.components() {
        let Component::Normal(name) = component else {
            return None;
        };
        if !out.is_empty() {
            out.push('/');
        }
        out.push_str(name.to_str()?);
    }
    (!out.is_empty()).then_some(out)
}

/// Converts a filesystem timestamp to fractional seconds since the epoch.
///
/// Times before the epoch come out negative.
#[must_use]
pub fn epoch_seconds(time: SystemTime) -> f64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => after.as_secs_f64(),
        Err(before) => -before.duration().as_secs_f64(),
    }
}

/// Serde adapter for `created_at`.
///
/// Writes RFC 3339 with microseconds. Reads RFC 3339, or a naive ISO-8601
/// timestamp without offset, which is taken as local time.
mod created_at {
    use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, SecondsFormat, TimeZone};
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(
        value: &DateTime<FixedOffset>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Micros, false))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<FixedOffset>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}")))
    }

    pub(super) fn parse(raw: &str) -> Option<DateTime<FixedOffset>> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed);
        }
        let naive: NaiveDateTime = raw.parse().ok()?;
        Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.fixed_offset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    fn sample() -> Manifest {
        Manifest::new(
            "/data/photos",
            vec![
                FileRecord::new("sub/b.txt", 20, 1_700_000_001.5),
                FileRecord::new("a.txt", 10, 1_700_000_000.25),
                FileRecord::new("sub/a.txt", 5, 1_700_000_002.0),
            ],
        )
    }

    #[test]
    fn test_manifest_sorts_files() {
        let manifest = sample();
        let paths: Vec<&str> = manifest
            .files()
            .iter()
            .map(|f| f.relative_path.as_str())
            .collect();
        assert_eq!(paths, ["a.txt", "sub/a.txt", "sub/b.txt"]);
        assert_eq!(manifest.files_count(), 3);
        assert!(manifest.validate().is_ok());
    }

    #[test]
    fn test_manifest_sort_is_bytewise() {
        let manifest = Manifest::new(
            "/r",
            vec![
                FileRecord::new("b", 1, 0.0),
                FileRecord::new("B", 1, 0.0),
                FileRecord::new("a-b", 1, 0.0),
                FileRecord::new("a/b", 1, 0.0),
            ],
        );
        let paths: Vec<&str> = manifest
            .files()
            .iter()
            .map(|f| f.relative_path.as_str())
            .collect();
        assert_eq!(paths, ["B", "a-b", "a/b", "b"]);
    }

    #[test]
    fn test_manifest_lookup_and_totals() {
        let manifest = sample();
        assert_eq!(manifest.get("sub/b.txt").map(|f| f.size), Some(20));
        assert!(manifest.get("missing.txt").is_none());
        assert_eq!(manifest.total_size(), 35);
    }

    #[test]
    fn test_record_matches_compares_size_and_mtime() {
        let a = FileRecord::new("a.txt", 10, 1.0);
        assert!(a.matches(&FileRecord::new("a.txt", 10, 1.0)));
        assert!(!a.matches(&FileRecord::new("a.txt", 15, 1.0)));
        assert!(!a.matches(&FileRecord::new("a.txt", 10, 1.5)));
    }

    #[test]
    fn test_serialized_field_order() -> anyhow::Result<()> {
        let json = serde_json::to_string(&sample())?;
        let dir = json.find("\"scanned_directory\"").unwrap();
        let created = json.find("\"created_at\"").unwrap();
        let count = json.find("\"files_count\"").unwrap();
        let files = json.find("\"files\":").unwrap();
        assert!(dir < created && created < count && count < files);
        assert!(json.contains(r#"{"relative_path":"a.txt","size":10,"mtime":1700000000.25}"#));
        Ok(())
    }

    #[test]
    fn test_json_round_trip_preserves_mtime_bits() -> anyhow::Result<()> {
        let created_at = DateTime::parse_from_rfc3339("2024-05-01T12:00:00.123456+02:00")?;
        let manifest = Manifest::with_created_at(
            "/r",
            created_at,
            vec![FileRecord::new("x", 1, 1_712_345_678.123_456_7)],
        );
        let json = serde_json::to_string_pretty(&manifest)?;
        let loaded: Manifest = serde_json::from_str(&json)?;
        assert_eq!(loaded, manifest);
        Ok(())
    }

    #[test]
    fn test_created_at_accepts_naive_timestamp() {
        assert!(created_at::parse("2024-03-01T10:15:30.123456").is_some());
        assert!(created_at::parse("2024-03-01T10:15:30").is_some());
        assert!(created_at::parse("2024-03-01T10:15:30.5+02:00").is_some());
        assert!(created_at::parse("yesterday").is_none());
    }

    #[test]
    fn test_validate_detects_broken_invariants() -> anyhow::Result<()> {
        let unsorted = r#"{"scanned_directory":"/r","created_at":"2024-01-01T00:00:00Z",
            "files_count":2,"files":[
            {"relative_path":"b","size":1,"mtime":0.0},
            {"relative_path":"a","size":1,"mtime":0.0}]}"#;
        let manifest: Manifest = serde_json::from_str(unsorted)?;
        assert!(manifest.validate().unwrap_err().contains("not sorted"));

        let duplicate = r#"{"scanned_directory":"/r","created_at":"2024-01-01T00:00:00Z",
            "files_count":2,"files":[
            {"relative_path":"a","size":1,"mtime":0.0},
            {"relative_path":"a","size":2,"mtime":0.0}]}"#;
        let manifest: Manifest = serde_json::from_str(duplicate)?;
        assert!(manifest.validate().unwrap_err().contains("duplicate"));

        let miscounted = r#"{"scanned_directory":"/r","created_at":"2024-01-01T00:00:00Z",
            "files_count":5,"files":[]}"#;
        let manifest: Manifest = serde_json::from_str(miscounted)?;
        assert!(manifest.validate().unwrap_err().contains("files_count"));
        Ok(())
    }

    #[test]
    fn test_to_posix_relative() {
        assert_eq!(
            to_posix_relative(&PathBuf::from("sub").join("dir").join("f.txt")),
            Some("sub/dir/f.txt".to_string())
        );
        assert_eq!(to_posix_relative(Path::new("f.txt")), Some("f.txt".to_string()));
        assert_eq!(to_posix_relative(Path::new("")), None);
        assert_eq!(to_posix_relative(Path::new("../escape")), None);
        assert_eq!(to_posix_relative(Path::new("/abs")), None);
    }

    #[test]
    fn test_epoch_seconds() {
        let t = UNIX_EPOCH + Duration::from_millis(1500);
        assert!((epoch_seconds(t) - 1.5).abs() < f64::EPSILON);

        let before = UNIX_EPOCH - Duration::from_secs(2);
        assert!((epoch_seconds(before) + 2.0).abs() < f64::EPSILON);
    }
}
