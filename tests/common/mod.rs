#![allow(dead_code)]

use anyhow::Result;
use assert_cmd::Command;
use fsnap::SnapshotContext;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated store, config and data directory for one test
pub struct TestEnv {
    pub temp_dir: TempDir,
    pub ctx: SnapshotContext,
}

impl TestEnv {
    /// Create an environment with an empty store and a `data/` directory
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let store_path = temp_dir.path().join("store");
        let config_path = temp_dir.path().join(".config/fsnap/config.toml");
        fs::create_dir_all(temp_dir.path().join("data"))?;

        let ctx = SnapshotContext::new_explicit(store_path, config_path)?;

        Ok(Self { temp_dir, ctx })
    }

    /// Get the temporary directory path
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Directory that tests populate and scan
    pub fn data_dir(&self) -> PathBuf {
        self.path().join("data")
    }

    pub fn store_path(&self) -> &Path {
        self.ctx.store.root()
    }

    pub fn config_path(&self) -> &Path {
        &self.ctx.config_path
    }

    /// Write `contents` to `relative` under the data directory, creating parents
    pub fn write(&self, relative: &str, contents: &[u8]) -> Result<PathBuf> {
        let path = self.data_dir().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    /// `fsnap` binary bound to this environment's store, config and home
    pub fn cmd(&self) -> Result<Command> {
        let mut cmd = Command::cargo_bin("fsnap")?;
        cmd.env("HOME", self.path())
            .env("FSNAP_STORE_PATH", self.store_path())
            .env("FSNAP_CONFIG_PATH", self.config_path())
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1");
        Ok(cmd)
    }

    /// Run `fsnap scan <data> --name <name>` and require success
    pub fn scan(&self, name: &str) -> Result<()> {
        self.cmd()?
            .arg("scan")
            .arg(self.data_dir())
            .args(["--name", name])
            .assert()
            .success();
        Ok(())
    }
}
