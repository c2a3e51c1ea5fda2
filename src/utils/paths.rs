use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Makes a path absolute, resolving relative paths from current directory
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined
pub fn make_absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        let current_dir = std::env::current_dir().context("Could not determine current directory")?;
        Ok(current_dir.join(path))
    }
}

/// Resolves a user-supplied directory argument: tilde expansion, then absolute
///
/// # Errors
///
/// Returns an error if the path is empty or the current directory is unknown
pub fn resolve_user_path(path: &str) -> Result<PathBuf> {
    make_absolute(&super::expand_tilde(path)?)
}
