/// TOML parsing and validation.
pub mod parser;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// User configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// `[core]` table
    #[serde(default)]
    pub core: CoreConfig,

    /// `[output]` table
    #[serde(default)]
    pub output: OutputConfig,
}

/// Store settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CoreConfig {
    /// Directory holding saved snapshots; `~` is expanded
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
}

/// Terminal output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputConfig {
    /// Use ANSI colors in terminal output
    #[serde(default = "default_color")]
    pub color: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: default_color(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    ///
    /// A missing file yields the defaults; nothing is written.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file exists but cannot be read
    /// - The file contains invalid TOML
    /// - A value fails validation
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        parser::parse_config_file(path)
    }

    /// Snapshot store directory with `~` expanded
    ///
    /// # Errors
    ///
    /// Returns an error if the configured path is empty.
    pub fn resolved_store_path(&self) -> Result<PathBuf> {
        crate::utils::expand_tilde(&self.core.store_path.to_string_lossy())
    }
}

// Default functions for serde
fn default_store_path() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/tmp"));
    home.join(crate::DEFAULT_STORE_DIR)
}

const fn default_color() -> bool {
    true
}
