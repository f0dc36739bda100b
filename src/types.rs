use std::fmt;
use std::process::ExitStatus;
use std::str::FromStr;

use serde::Deserialize;

/// What to do with one of the child's standard streams.
///
/// - `Pipe`: capture it (only meaningful for stdout / stderr, which are then
///   buffered into the result).
/// - `Ignore`: connect it to the null device.
/// - `Inherit`: share the parent's stream; nothing is captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StdioMode {
    Pipe,
    Ignore,
    Inherit,
}

impl Default for StdioMode {
    fn default() -> Self {
        StdioMode::Pipe
    }
}

impl FromStr for StdioMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pipe" => Ok(StdioMode::Pipe),
            "ignore" | "null" => Ok(StdioMode::Ignore),
            "inherit" => Ok(StdioMode::Inherit),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for StdioMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StdioMode::Pipe => "pipe",
            StdioMode::Ignore => "ignore",
            StdioMode::Inherit => "inherit",
        };
        f.write_str(s)
    }
}

/// Output channel a chunk arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Stdout,
    Stderr,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Stdout => f.write_str("stdout"),
            Channel::Stderr => f.write_str("stderr"),
        }
    }
}

/// A chunk of output, forwarded to progress observers as it is buffered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub channel: Channel,
    pub chunk: Vec<u8>,
}

/// How a process terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Normal exit with the given status code.
    Code(i32),
    /// Terminated by the given signal (unix only).
    Signal(i32),
    /// Neither a code nor a signal was reported.
    Unknown,
}

impl ExitCode {
    pub fn success(&self) -> bool {
        matches!(self, ExitCode::Code(0))
    }

    pub fn code(&self) -> Option<i32> {
        match self {
            ExitCode::Code(c) => Some(*c),
            _ => None,
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return ExitCode::Code(code);
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return ExitCode::Signal(signal);
            }
        }

        ExitCode::Unknown
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Code(c) => write!(f, "{c}"),
            ExitCode::Signal(s) => write!(f, "signal {s}"),
            ExitCode::Unknown => f.write_str("unknown"),
        }
    }
}
