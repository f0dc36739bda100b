// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, ValueEnum};

use crate::types::StdioMode;

/// Command-line arguments for `buffspawn`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "buffspawn",
    version,
    about = "Run a command, buffer its stdout and stderr, print them when it exits.",
    long_about = None
)]
pub struct CliArgs {
    /// Spawn profile (TOML).
    ///
    /// Default: `buffspawn.toml` in the current directory, if it exists.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Working directory for the command.
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Extra environment variable for the command (repeatable).
    #[arg(long = "env", value_name = "KEY=VALUE")]
    pub env: Vec<String>,

    /// What to do with the command's stdout.
    #[arg(long, value_enum, value_name = "MODE")]
    pub stdout: Option<StdioArg>,

    /// What to do with the command's stderr.
    #[arg(long, value_enum, value_name = "MODE")]
    pub stderr: Option<StdioArg>,

    /// Log each output chunk (at debug level) as it arrives.
    #[arg(long)]
    pub progress: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `BUFFSPAWN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// The command to run.
    #[arg(required = true)]
    pub command: String,

    /// Arguments passed to the command.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Stream disposition as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum StdioArg {
    Pipe,
    Ignore,
    Inherit,
}

impl From<StdioArg> for StdioMode {
    fn from(arg: StdioArg) -> Self {
        match arg {
            StdioArg::Pipe => StdioMode::Pipe,
            StdioArg::Ignore => StdioMode::Ignore,
            StdioArg::Inherit => StdioMode::Inherit,
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Accepts the same names as `--log-level` (plus `warning`), for
/// `BUFFSPAWN_LOG`.
impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(other.to_string()),
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_args_keep_their_hyphens() {
        let args = CliArgs::try_parse_from([
            "buffspawn", "--stdout", "ignore", "--env", "A=1", "--", "ls", "-la", "/tmp",
        ])
        .unwrap();

        assert_eq!(args.command, "ls");
        assert_eq!(args.args, vec!["-la", "/tmp"]);
        assert!(matches!(args.stdout, Some(StdioArg::Ignore)));
        assert_eq!(args.env, vec!["A=1"]);
    }

    #[test]
    fn log_level_flag_and_env_spelling_agree() {
        let args =
            CliArgs::try_parse_from(["buffspawn", "--log-level", "debug", "--", "true"]).unwrap();
        assert_eq!(args.log_level, Some(LogLevel::Debug));
        assert_eq!("debug".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert_eq!("warning".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert!("chatty".parse::<LogLevel>().is_err());
        assert_eq!(tracing::Level::from(LogLevel::Trace), tracing::Level::TRACE);
    }

    #[test]
    fn command_is_required() {
        assert!(CliArgs::try_parse_from(["buffspawn"]).is_err());
    }
}
