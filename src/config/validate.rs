// src/config/validate.rs

use std::str::FromStr;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::ConfigError;
use crate::invocation::SpawnOptions;
use crate::types::StdioMode;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = ConfigError;

    fn try_from(raw: RawConfigFile) -> Result<Self, Self::Error> {
        let defaults = SpawnOptions::default();

        validate_env(&raw)?;
        if let Some(ref cwd) = raw.cwd {
            if !cwd.is_dir() {
                return Err(ConfigError::InvalidCwd(cwd.display().to_string()));
            }
        }

        let options = SpawnOptions {
            stdin: parse_mode(raw.stdin.as_deref(), defaults.stdin)?,
            stdout: parse_mode(raw.stdout.as_deref(), defaults.stdout)?,
            stderr: parse_mode(raw.stderr.as_deref(), defaults.stderr)?,
            cwd: raw.cwd,
            env: raw.env,
            env_clear: raw.env_clear,
        };

        Ok(ConfigFile::new_unchecked(options))
    }
}

fn parse_mode(raw: Option<&str>, default: StdioMode) -> Result<StdioMode, ConfigError> {
    match raw {
        None => Ok(default),
        Some(s) => StdioMode::from_str(s).map_err(ConfigError::InvalidStdioMode),
    }
}

fn validate_env(raw: &RawConfigFile) -> Result<(), ConfigError> {
    for key in raw.env.keys() {
        if key.is_empty() || key.contains('=') || key.contains('\0') {
            return Err(ConfigError::InvalidEnv(format!("bad variable name {key:?}")));
        }
    }
    Ok(())
}

/// Parse a `KEY=VALUE` pair as given on the command line.
pub fn parse_env_pair(s: &str) -> Result<(String, String), ConfigError> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(ConfigError::InvalidEnv(format!("expected KEY=VALUE, got {s:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_profile_uses_defaults() {
        let cfg = ConfigFile::try_from(RawConfigFile::default()).unwrap();
        assert_eq!(cfg.options(), &SpawnOptions::default());
    }

    #[test]
    fn unknown_stdio_mode_is_rejected() {
        let raw = RawConfigFile {
            stdout: Some("stream".to_string()),
            ..Default::default()
        };
        let err = ConfigFile::try_from(raw).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidStdioMode(ref s) if s == "stream"));
    }

    #[test]
    fn missing_cwd_is_rejected() {
        let raw = RawConfigFile {
            cwd: Some("/definitely/not/here".into()),
            ..Default::default()
        };
        assert!(matches!(
            ConfigFile::try_from(raw),
            Err(ConfigError::InvalidCwd(_))
        ));
    }

    #[test]
    fn env_pairs() {
        assert_eq!(
            parse_env_pair("A=b=c").unwrap(),
            ("A".to_string(), "b=c".to_string())
        );
        assert_eq!(parse_env_pair("EMPTY=").unwrap().1, "");
        assert!(parse_env_pair("=x").is_err());
        assert!(parse_env_pair("novalue").is_err());
    }
}
