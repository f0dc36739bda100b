// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::invocation::SpawnOptions;
use crate::types::StdioMode;

/// Spawn profile as read from a TOML file, before validation.
///
/// ```toml
/// cwd = "fixtures"
/// env_clear = false
/// stdin = "ignore"
/// stdout = "pipe"
/// stderr = "inherit"
///
/// [env]
/// RUST_BACKTRACE = "1"
/// ```
///
/// Every key is optional.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub cwd: Option<PathBuf>,

    #[serde(default)]
    pub env: BTreeMap<String, String>,

    #[serde(default)]
    pub env_clear: bool,

    /// Stream dispositions, kept as strings so an invalid value is reported
    /// with the offending text rather than a generic serde error.
    #[serde(default)]
    pub stdin: Option<String>,

    #[serde(default)]
    pub stdout: Option<String>,

    #[serde(default)]
    pub stderr: Option<String>,
}

/// Validated spawn profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    options: SpawnOptions,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(options: SpawnOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SpawnOptions {
        &self.options
    }

    pub fn into_options(self) -> SpawnOptions {
        self.options
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(SpawnOptions::default())
    }
}

/// Per-run overrides layered over a [`ConfigFile`] (typically from the CLI).
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
    pub stdout: Option<StdioMode>,
    pub stderr: Option<StdioMode>,
}

impl Overrides {
    pub fn apply(self, mut options: SpawnOptions) -> SpawnOptions {
        if let Some(cwd) = self.cwd {
            options.cwd = Some(cwd);
        }
        options.env.extend(self.env);
        if let Some(mode) = self.stdout {
            options.stdout = mode;
        }
        if let Some(mode) = self.stderr {
            options.stderr = mode;
        }
        options
    }
}
