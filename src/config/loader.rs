// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::ConfigError;

/// Read and deserialize a profile without validating it.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile, ConfigError> {
    let contents = fs::read_to_string(path.as_ref())?;
    let config: RawConfigFile = toml::from_str(&contents)?;
    Ok(config)
}

/// Read, deserialize and validate a profile.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile, ConfigError> {
    let raw = load_from_path(&path)?;
    ConfigFile::try_from(raw)
}

/// Profile picked up from the working directory when `--config` is not given.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("buffspawn.toml")
}
