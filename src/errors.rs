// src/errors.rs

//! Crate-wide error types.
//!
//! A buffered execution fails in one of two canonical ways:
//!
//! - [`ExecError::Spawn`]: the process never started (missing executable,
//!   permission denied, bad working directory, ...). The native launcher error
//!   is kept as the source and nothing is buffered.
//! - [`ExecError::Command`]: the process ran and terminated with a non-zero
//!   code or a signal. This is the `ECMDERR` shape carrying the reconstructed
//!   command line and both captured streams.
//!
//! [`ExecError::Io`] covers the launcher failing *after* the process started
//! (reading a pipe or reaping the child).

use std::fmt;
use std::io;

use thiserror::Error;

use crate::types::ExitCode;

/// Error code attached to every non-zero exit failure.
pub const ECMDERR: &str = "ECMDERR";

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("failed to spawn \"{command}\": {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Command(#[from] CommandFailure),

    #[error("IO error while running process: {0}")]
    Io(#[from] io::Error),
}

impl ExecError {
    /// Error code in the `err-code` tradition: `ECMDERR` for non-zero exits,
    /// `None` for everything else.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            ExecError::Command(_) => Some(ECMDERR),
            _ => None,
        }
    }

    pub fn is_spawn_failure(&self) -> bool {
        matches!(self, ExecError::Spawn { .. })
    }

    /// The command failure, if the process ran and exited unsuccessfully.
    pub fn as_command_failure(&self) -> Option<&CommandFailure> {
        match self {
            ExecError::Command(failure) => Some(failure),
            _ => None,
        }
    }
}

/// A process that ran to completion but did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFailure {
    full_command: String,
    exit: ExitCode,
    stdout: String,
    stderr: String,
}

impl CommandFailure {
    pub fn new(
        full_command: impl Into<String>,
        exit: ExitCode,
        stdout: String,
        stderr: String,
    ) -> Self {
        Self {
            full_command: full_command.into(),
            exit,
            stdout,
            stderr,
        }
    }

    /// `command` followed by the space-joined arguments.
    pub fn full_command(&self) -> &str {
        &self.full_command
    }

    pub fn exit(&self) -> ExitCode {
        self.exit
    }

    /// Numeric exit status, `None` if the process was killed by a signal.
    pub fn status(&self) -> Option<i32> {
        self.exit.code()
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    /// Human-oriented failure details; the captured stderr.
    pub fn details(&self) -> &str {
        &self.stderr
    }

    pub fn code(&self) -> &'static str {
        ECMDERR
    }
}

impl fmt::Display for CommandFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Failed to execute \"{}\", exit code of #{}",
            self.full_command, self.exit
        )
    }
}

impl std::error::Error for CommandFailure {}

/// Errors raised while loading or validating a config profile.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("invalid stdio mode: {0} (expected \"pipe\", \"ignore\" or \"inherit\")")]
    InvalidStdioMode(String),

    #[error("working directory does not exist or is not a directory: {0}")]
    InvalidCwd(String),

    #[error("invalid environment entry: {0}")]
    InvalidEnv(String),
}

pub type Result<T> = std::result::Result<T, ExecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_failure_message_embeds_command_and_code() {
        let failure = CommandFailure::new(
            "node fixtures/fail",
            ExitCode::Code(25),
            "stdout fail".to_string(),
            "stderr fail".to_string(),
        );

        assert_eq!(
            failure.to_string(),
            "Failed to execute \"node fixtures/fail\", exit code of #25"
        );
        assert_eq!(failure.status(), Some(25));
        assert_eq!(failure.details(), "stderr fail");

        let err = ExecError::from(failure);
        assert_eq!(err.code(), Some(ECMDERR));
        assert!(!err.is_spawn_failure());
    }

    #[test]
    fn spawn_failure_has_no_error_code() {
        let err = ExecError::Spawn {
            command: "nope".to_string(),
            source: io::Error::from(io::ErrorKind::NotFound),
        };

        assert!(err.is_spawn_failure());
        assert_eq!(err.code(), None);
        assert!(err.as_command_failure().is_none());
        assert!(std::error::Error::source(&err).is_some());
    }
}
