use super::{SNAPSHOT_EXTENSION, SnapshotSummary, validate_name};
use crate::error::{Result, SnapshotError};
use crate::snapshot::Manifest;
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Named manifests stored as `<name>.json` files in one directory.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root: PathBuf,
}

impl SnapshotStore {
    /// Creates a store rooted at `root`. Nothing is created until the first save.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Store directory, without touching the filesystem.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the store directory if needed and returns it.
    ///
    /// Calling this repeatedly is harmless.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn storage_dir(&self) -> Result<&Path> {
        fs::create_dir_all(&self.root).map_err(|e| SnapshotError::io(&self.root, e))?;
        Ok(&self.root)
    }

    /// Path of the artifact backing `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::InvalidName`] if `name` is not a usable name.
    pub fn path_for(&self, name: &str) -> Result<PathBuf> {
        validate_name(name)?;
        Ok(self.root.join(format!("{name}.{SNAPSHOT_EXTENSION}")))
    }

    /// Whether a snapshot called `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.path_for(name).is_ok_and(|p| p.is_file())
    }

    /// Writes `manifest` under `name`, replacing any previous snapshot of that name.
    ///
    /// The file is written next to its destination and renamed into place, so a
    /// reader never sees a partially written snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `name` is invalid
    /// - The store directory cannot be created
    /// - Serialization or the write fails
    pub fn save_manifest(&self, manifest: &Manifest, name: &str) -> Result<PathBuf> {
        let target = self.path_for(name)?;
        let dir = self.storage_dir()?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| SnapshotError::io(dir, e))?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, manifest).map_err(|source| {
                SnapshotError::Json {
                    path: target.clone(),
                    source,
                }
            })?;
            writer
                .write_all(b"\n")
                .and_then(|()| writer.flush())
                .map_err(|e| SnapshotError::io(&target, e))?;
        }
        tmp.persist(&target)
            .map_err(|e| SnapshotError::io(&target, e.error))?;

        debug!(snapshot = name, path = %target.display(), files = manifest.files_count(), "Saved snapshot");
        Ok(target)
    }

    /// Loads the snapshot called `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `name` is invalid
    /// - No such snapshot exists ([`SnapshotError::SnapshotNotFound`])
    /// - The file is not valid snapshot JSON
    /// - The manifest breaks an invariant ([`SnapshotError::Corrupt`])
    pub fn load_manifest(&self, name: &str) -> Result<Manifest> {
        let path = self.path_for(name)?;

        let file = match fs::File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SnapshotError::SnapshotNotFound(name.to_string()));
            }
            Err(e) => return Err(SnapshotError::io(&path, e)),
        };

        let manifest: Manifest = serde_json::from_reader(BufReader::new(file))
            .map_err(|source| SnapshotError::Json {
                path: path.clone(),
                source,
            })?;

        manifest
            .validate()
            .map_err(|reason| SnapshotError::Corrupt {
                name: name.to_string(),
                reason,
            })?;

        debug!(snapshot = name, files = manifest.files_count(), "Loaded snapshot");
        Ok(manifest)
    }

    /// Names of all stored snapshots, sorted ascending.
    ///
    /// Files without the snapshot extension are ignored. A store directory
    /// that does not exist yet holds no snapshots.
    ///
    /// # Errors
    ///
    /// Returns an error if the store directory exists but cannot be read.
    pub fn list_manifest_names(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(SnapshotError::io(&self.root, e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| SnapshotError::io(&self.root, e))?.path();

            if path.extension().and_then(|e| e.to_str()) != Some(SNAPSHOT_EXTENSION)
                || !path.is_file()
            {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str())
                && validate_name(stem).is_ok()
            {
                names.push(stem.to_string());
            }
        }

        names.sort_unstable();
        Ok(names)
    }

    /// Header information of every readable snapshot, sorted by name.
    ///
    /// Snapshots that fail to load are logged and left out.
    ///
    /// # Errors
    ///
    /// Returns an error if the store directory exists but cannot be read.
    pub fn list_summaries(&self) -> Result<Vec<SnapshotSummary>> {
        let mut summaries = Vec::new();
        for name in self.list_manifest_names()? {
            match self.load_manifest(&name) {
                Ok(manifest) => summaries.push(SnapshotSummary::new(name, &manifest)),
                Err(e) => warn!(snapshot = name.as_str(), error = %e, "Skipping unreadable snapshot"),
            }
        }
        Ok(summaries)
    }
}
