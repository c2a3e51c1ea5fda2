//! Utility functions and helpers.
//!
//! - Path manipulation (tilde expansion, absolute paths)
//! - File size, timestamp and status formatting
//!
//! # Submodules
//!
//! - [`formatters`]: Output formatting
//! - [`paths`]: Path manipulation
//!
//! # Examples
//!
//! ```
//! use fsnap::utils::{expand_tilde, format_size};
//!
//! # fn main() -> anyhow::Result<()> {
//! // Expand tilde in paths
//! let path = expand_tilde("~/.safe-fs-snapshot")?;
//!
//! // Format file sizes
//! let size_str = format_size(1024 * 1024); // "1.00 MB"
//! # Ok(())
//! # }
//! ```

/// Output formatting and colorization
pub mod formatters;
/// Path manipulation and resolution utilities
pub mod paths;

pub use formatters::format_size;

use anyhow::Result;
use std::path::PathBuf;

/// Expands a path starting with `~` to the user's home directory.
///
/// # Errors
///
/// Returns an error if the path is empty.
pub fn expand_tilde(path: &str) -> Result<PathBuf> {
    if path.is_empty() {
        anyhow::bail!("Path cannot be empty");
    }
    if let Some(home) = dirs::home_dir() {
        if path == "~" {
            return Ok(home);
        }
        if let Some(rest) = path.strip_prefix("~/") {
            return Ok(home.join(rest));
        }
    }
    Ok(PathBuf::from(path))
}
