//! Directory scanner producing canonical manifests.
//!
//! The `Scanner` walks a directory tree depth-first with an explicit work
//! stack, so tree depth is bounded by memory rather than call depth. Every
//! unreadable directory or file is recorded and logged, then skipped; only
//! an invalid root aborts a scan.

use crate::error::{EntryFailure, EntryReadError, InvalidRootReason, Result, SnapshotError};
use crate::snapshot::record::{FileRecord, Manifest, epoch_seconds, to_posix_relative};
use std::fs::{self, DirEntry};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Everything a scan produced: the manifest plus the entries it had to skip.
#[derive(Debug)]
pub struct ScanOutcome {
    /// The sorted manifest of all readable regular files.
    pub manifest: Manifest,
    /// Directories and files that could not be read, in visit order.
    pub skipped: Vec<EntryReadError>,
}

impl ScanOutcome {
    /// Whether any entry had to be skipped.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// What a directory entry turned out to be.
enum Classified {
    Directory(PathBuf),
    File(FileRecord),
    Other,
}

/// Scanner for one root directory
pub struct Scanner {
    /// Canonical absolute root; base of every relative path
    root: PathBuf,
}

impl Scanner {
    /// Validate `root` and resolve it to a canonical absolute path
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::InvalidRoot`] if:
    /// - Nothing exists at `root`
    /// - `root` is not a directory
    /// - `root` cannot be canonicalized
    pub fn new(root: &Path) -> Result<Self> {
        let invalid = |reason| SnapshotError::InvalidRoot {
            path: root.to_path_buf(),
            reason,
        };

        let resolved = fs::canonicalize(root).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => invalid(InvalidRootReason::NotFound),
            _ => invalid(InvalidRootReason::Unresolvable(e)),
        })?;

        let metadata =
            fs::metadata(&resolved).map_err(|e| invalid(InvalidRootReason::Unresolvable(e)))?;
        if !metadata.is_dir() {
            return Err(invalid(InvalidRootReason::NotADirectory));
        }

        Ok(Self { root: resolved })
    }

    /// The canonical root this scanner walks
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the tree and build the manifest
    ///
    /// Per-entry failures never abort the walk. Each one is logged as a
    /// warning and returned in [`ScanOutcome::skipped`].
    #[must_use]
    pub fn run(&self) -> ScanOutcome {
        let mut stack = vec![self.root.clone()];
        let mut files = Vec::new();
        let mut skipped = Vec::new();

        while let Some(dir) = stack.pop() {
            let entries = match read_entries(&dir) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(path = %dir.display(), error = %err.failure(), "Skipping unreadable directory");
                    skipped.push(err);
                    continue;
                }
            };
            debug!(path = %dir.display(), entries = entries.len(), "Scanning directory");

            for entry in entries {
                match self.classify(&entry) {
                    Ok(Classified::Directory(path)) => stack.push(path),
                    Ok(Classified::File(record)) => files.push(record),
                    Ok(Classified::Other) => {
                        debug!(path = %entry.path().display(), "Ignoring non-regular entry");
                    }
                    Err(err) => {
                        warn!(path = %err.path().display(), error = %err.failure(), "Skipping unreadable file");
                        skipped.push(err);
                    }
                }
            }
        }

        let manifest = Manifest::new(self.root.to_string_lossy(), files);
        info!(
            root = %self.root.display(),
            files = manifest.files_count(),
            skipped = skipped.len(),
            "Scan complete"
        );

        ScanOutcome { manifest, skipped }
    }

    /// Classify one entry without following symlinks
    fn classify(&self, entry: &DirEntry) -> std::result::Result<Classified, EntryReadError> {
        let path = entry.path();
        let file_type = entry
            .file_type()
            .map_err(|e| EntryReadError::file(&path, e))?;

        if file_type.is_dir() {
            return Ok(Classified::Directory(path));
        }
        if !file_type.is_file() {
            return Ok(Classified::Other);
        }

        let relative_path = path
            .strip_prefix(&self.root)
            .ok()
            .and_then(to_posix_relative)
            .ok_or_else(|| EntryReadError::file(&path, EntryFailure::NonUtf8Path))?;

        let metadata = entry
            .metadata()
            .map_err(|e| EntryReadError::file(&path, e))?;
        let modified = metadata
            .modified()
            .map_err(|e| EntryReadError::file(&path, e))?;

        Ok(Classified::File(FileRecord {
            relative_path,
            size: metadata.len(),
            mtime: epoch_seconds(modified),
        }))
    }
}

/// List every entry of `dir`, or fail for the directory as a whole
///
/// The listing is collected before any entry is looked at, so a directory
/// that fails part-way contributes nothing. The handle is closed on return.
fn read_entries(dir: &Path) -> std::result::Result<Vec<DirEntry>, EntryReadError> {
    fs::read_dir(dir)
        .and_then(|iter| iter.collect::<io::Result<Vec<_>>>())
        .map_err(|e| EntryReadError::directory(dir, e))
}

/// Scan `root` and return its manifest, discarding the skip list
///
/// # Errors
///
/// Returns [`SnapshotError::InvalidRoot`] if `root` does not exist or is
/// not a directory.
pub fn scan(root: &Path) -> Result<Manifest> {
    Ok(Scanner::new(root)?.run().manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::TempDir;

    fn create_test_structure(root: &Path) -> Result<()> {
        // root/
        //   a.txt           (10 bytes)
        //   sub/
        //     b.txt         (20 bytes)
        //     deeper/
        //       c.txt       (3 bytes)
        //   empty/
        fs::create_dir_all(root.join("sub/deeper"))?;
        fs::create_dir_all(root.join("empty"))?;
        fs::write(root.join("a.txt"), [b'a'; 10])?;
        fs::write(root.join("sub/b.txt"), [b'b'; 20])?;
        fs::write(root.join("sub/deeper/c.txt"), b"ccc")?;
        Ok(())
    }

    fn paths(manifest: &Manifest) -> Vec<&str> {
        manifest
            .files()
            .iter()
            .map(|f| f.relative_path.as_str())
            .collect()
    }

    #[test]
    fn test_scan_basic_tree() -> Result<()> {
        let temp_dir = TempDir::new()?;
        create_test_structure(temp_dir.path())?;

        let manifest = scan(temp_dir.path())?;

        assert_eq!(paths(&manifest), ["a.txt", "sub/b.txt", "sub/deeper/c.txt"]);
        assert_eq!(manifest.files()[0].size, 10);
        assert_eq!(manifest.files()[1].size, 20);
        assert_eq!(manifest.files_count(), 3);
        assert_eq!(
            manifest.scanned_directory(),
            fs::canonicalize(temp_dir.path())?.to_string_lossy()
        );
        Ok(())
    }

    #[test]
    fn test_scan_empty_directory() -> Result<()> {
        let temp_dir = TempDir::new()?;

        let outcome = Scanner::new(temp_dir.path())?.run();

        assert!(outcome.manifest.is_empty());
        assert_eq!(outcome.manifest.files_count(), 0);
        assert!(outcome.is_complete());
        Ok(())
    }

    #[test]
    fn test_scan_only_subdirectories() -> Result<()> {
        let temp_dir = TempDir::new()?;
        fs::create_dir_all(temp_dir.path().join("x/y/z"))?;
        fs::create_dir_all(temp_dir.path().join("w"))?;

        let manifest = scan(temp_dir.path())?;
        assert!(manifest.is_empty());
        Ok(())
    }

    #[test]
    fn test_scan_nonexistent_root() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let missing = temp_dir.path().join("nope");

        let err = scan(&missing).unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::InvalidRoot {
                reason: InvalidRootReason::NotFound,
                ..
            }
        ));
        Ok(())
    }

    #[test]
    fn test_scan_file_as_root() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let file = temp_dir.path().join("plain.txt");
        fs::write(&file, "x")?;

        let err = scan(&file).unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::InvalidRoot {
                reason: InvalidRootReason::NotADirectory,
                ..
            }
        ));
        Ok(())
    }

    #[test]
    fn test_scan_relative_root_is_resolved() -> Result<()> {
        let temp_dir = TempDir::new()?;
        create_test_structure(temp_dir.path())?;

        let dotted = temp_dir.path().join("sub").join("..");
        let manifest = scan(&dotted)?;

        assert_eq!(
            manifest.scanned_directory(),
            fs::canonicalize(temp_dir.path())?.to_string_lossy()
        );
        assert_eq!(manifest.files_count(), 3);
        Ok(())
    }

    #[test]
    fn test_scan_is_deterministic() -> Result<()> {
        let temp_dir = TempDir::new()?;
        create_test_structure(temp_dir.path())?;
        for i in 0..20 {
            fs::write(temp_dir.path().join(format!("sub/f{i:02}.dat")), vec![0u8; i])?;
        }

        let first = scan(temp_dir.path())?;
        let second = scan(temp_dir.path())?;

        assert_eq!(first.files(), second.files());
        assert!(first.validate().is_ok());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_ignores_symlinks() -> Result<()> {
        let temp_dir = TempDir::new()?;
        create_test_structure(temp_dir.path())?;
        std::os::unix::fs::symlink(
            temp_dir.path().join("a.txt"),
            temp_dir.path().join("link.txt"),
        )?;
        std::os::unix::fs::symlink(temp_dir.path().join("sub"), temp_dir.path().join("linkdir"))?;

        let manifest = scan(temp_dir.path())?;
        assert_eq!(paths(&manifest), ["a.txt", "sub/b.txt", "sub/deeper/c.txt"]);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_skips_unreadable_directory() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new()?;
        create_test_structure(temp_dir.path())?;
        let locked = temp_dir.path().join("locked");
        fs::create_dir(&locked)?;
        fs::write(locked.join("secret.txt"), "hidden")?;
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000))?;

        // Privileged users can read the directory anyway.
        let enforced = fs::read_dir(&locked).is_err();
        let outcome = Scanner::new(temp_dir.path())?.run();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755))?;

        let found = paths(&outcome.manifest);
        assert!(found.contains(&"a.txt"));
        assert!(found.contains(&"sub/b.txt"));
        assert!(found.contains(&"sub/deeper/c.txt"));

        if enforced {
            assert!(!found.contains(&"locked/secret.txt"));
            assert_eq!(outcome.skipped.len(), 1);
            let err = &outcome.skipped[0];
            assert_eq!(err.kind(), crate::error::EntryKind::Directory);
            assert!(matches!(err.failure(), EntryFailure::PermissionDenied));
            assert!(err.path().ends_with("locked"));
        }
        Ok(())
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_scan_skips_non_utf8_file_name() -> Result<()> {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new()?;
        create_test_structure(temp_dir.path())?;
        let bad = temp_dir.path().join("sub").join(OsStr::from_bytes(b"bad\xff.txt"));
        fs::write(&bad, b"x")?;

        let outcome = Scanner::new(temp_dir.path())?.run();

        assert_eq!(
            paths(&outcome.manifest),
            ["a.txt", "sub/b.txt", "sub/deeper/c.txt"]
        );
        assert!(!outcome.is_complete());
        assert_eq!(outcome.skipped.len(), 1);
        let err = &outcome.skipped[0];
        assert!(matches!(
            err,
            EntryReadError::File {
                failure: EntryFailure::NonUtf8Path,
                ..
            }
        ));
        assert_eq!(err.path().file_name(), bad.file_name());
        Ok(())
    }
}
