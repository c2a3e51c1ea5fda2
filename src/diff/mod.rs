//! Manifest comparison.
//!
//! [`diff`] classifies every path of two manifests into exactly one of
//! added, deleted, changed or unchanged. Records are compared by size and
//! modification time only; file contents are never read.

use crate::snapshot::{FileRecord, Manifest};
use serde::Serialize;
use std::collections::HashMap;

/// Classification of two manifests.
///
/// Every list is sorted ascending by relative path. Together the four lists
/// partition the union of both manifests' paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffReport {
    /// Paths only in the second manifest.
    pub added: Vec<String>,
    /// Paths only in the first manifest.
    pub deleted: Vec<String>,
    /// Paths in both whose size or mtime differ.
    pub changed: Vec<String>,
    /// Paths in both with identical size and mtime.
    pub unchanged: Vec<String>,
}

/// Per-category counts of a [`DiffReport`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffSummary {
    /// Number of added paths.
    pub added: usize,
    /// Number of deleted paths.
    pub deleted: usize,
    /// Number of changed paths.
    pub changed: usize,
    /// Number of unchanged paths.
    pub unchanged: usize,
}

impl DiffSummary {
    /// Number of distinct paths across both manifests.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.added + self.deleted + self.changed + self.unchanged
    }
}

/// One difference between two manifests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileChange<'a> {
    /// Present only in the second manifest.
    Added(&'a str),
    /// Present only in the first manifest.
    Deleted(&'a str),
    /// Present in both with different size or mtime.
    Changed(&'a str),
}

impl<'a> FileChange<'a> {
    /// The relative path this change refers to.
    #[must_use]
    pub const fn path(&self) -> &'a str {
        match self {
            Self::Added(p) | Self::Deleted(p) | Self::Changed(p) => p,
        }
    }
}

impl DiffReport {
    /// Aggregate counts.
    #[must_use]
    pub fn summary(&self) -> DiffSummary {
        DiffSummary {
            added: self.added.len(),
            deleted: self.deleted.len(),
            changed: self.changed.len(),
            unchanged: self.unchanged.len(),
        }
    }

    /// True when nothing was added, deleted or changed.
    #[must_use]
    pub fn is_identical(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty() && self.changed.is_empty()
    }

    /// All differences, merged into a single ascending path order.
    #[must_use]
    pub fn changes(&self) -> Vec<FileChange<'_>> {
        let mut changes: Vec<FileChange<'_>> = self
            .added
            .iter()
            .map(|p| FileChange::Added(p))
            .chain(self.deleted.iter().map(|p| FileChange::Deleted(p)))
            .chain(self.changed.iter().map(|p| FileChange::Changed(p)))
            .collect();
        changes.sort_unstable_by(|a, b| a.path().cmp(b.path()));
        changes
    }
}

/// Index a manifest by relative path.
fn by_path(manifest: &Manifest) -> HashMap<&str, &FileRecord> {
    manifest
        .files()
        .iter()
        .map(|f| (f.relative_path.as_str(), f))
        .collect()
}

/// Compare two manifests.
///
/// `from` is the baseline and `to` the later state. Neither input is
/// modified and there are no failure cases; two empty manifests produce an
/// empty report.
#[must_use]
pub fn diff(from: &Manifest, to: &Manifest) -> DiffReport {
    let from_files = by_path(from);
    let to_files = by_path(to);
    let mut report = DiffReport::default();

    for (path, to_file) in &to_files {
        match from_files.get(path) {
            Some(from_file) if from_file.matches(to_file) => {
                report.unchanged.push((*path).to_string());
            }
            Some(_) => report.changed.push((*path).to_string()),
            None => report.added.push((*path).to_string()),
        }
    }

    for path in from_files.keys() {
        if !to_files.contains_key(path) {
            report.deleted.push((*path).to_string());
        }
    }

    report.added.sort_unstable();
    report.deleted.sort_unstable();
    report.changed.sort_unstable();
    report.unchanged.sort_unstable();
    report
}
