// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::ConfigFile;
use crate::errors::{Result, ScriptqError};

/// Read and deserialize a config file.
///
/// No semantic checks happen here; [`load_or_default`] layers those on top.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: ConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a config file and validate it, treating a missing file as empty.
///
/// Every field has a serde default, so a missing or sparse file yields a
/// usable config. Validation rejects a zero queue capacity and an empty
/// interpreter. This is the entry point `run` uses.
pub fn load_or_default(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();

    let config = if path.exists() {
        load_from_path(path)?
    } else {
        debug!(path = %path.display(), "config file not found; using defaults");
        ConfigFile::default()
    };

    validate_config(&config)?;
    Ok(config)
}

/// The config path used when `--config` is not given: `Scriptq.toml` in
/// the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Scriptq.toml")
}

fn validate_config(cfg: &ConfigFile) -> Result<()> {
    validate_queue(cfg)?;
    validate_runner(cfg)?;
    Ok(())
}

fn validate_queue(cfg: &ConfigFile) -> Result<()> {
    if cfg.queue.capacity == 0 {
        return Err(ScriptqError::ConfigError(
            "[queue].capacity must be >= 1 (got 0)".to_string(),
        ));
    }

    Ok(())
}

fn validate_runner(cfg: &ConfigFile) -> Result<()> {
    if cfg.runner.interpreter.trim().is_empty() {
        return Err(ScriptqError::ConfigError(
            "[runner].interpreter must not be empty".to_string(),
        ));
    }

    Ok(())
}
