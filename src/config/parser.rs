use super::Config;
use anyhow::{Context, Result};
use std::path::Path;

/// Read and parse the config file at `path`
///
/// # Errors
///
/// Returns an error if the file cannot be read or is invalid.
pub fn parse_config_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config_str(&content)
        .with_context(|| format!("Invalid config file: {}", path.display()))
}

/// Parse and validate config TOML
///
/// # Errors
///
/// Returns an error on invalid TOML or an empty `core.store_path`.
pub fn parse_config_str(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse TOML config")?;

    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &Config) -> Result<()> {
    if config.core.store_path.as_os_str().is_empty() {
        anyhow::bail!("core.store_path must not be empty");
    }

    Ok(())
}
