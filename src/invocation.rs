// src/invocation.rs

//! What to run: command, arguments and spawn options.
//!
//! Callers may pass any of these shapes to [`crate::execute`]:
//!
//! - `"cmd"` / `String`
//! - `("cmd", args)` where `args` is any iterable of strings
//! - `("cmd", options)`
//! - `("cmd", args, options)`
//!
//! [`IntoInvocation`] is the one place where these shapes are resolved into
//! an [`Invocation`]; nothing past this module cares how the caller spelled it.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::types::StdioMode;

/// Options forwarded to the process launcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnOptions {
    /// Working directory of the child; the parent's when `None`.
    pub cwd: Option<PathBuf>,
    /// Environment overrides applied on top of the inherited environment.
    pub env: BTreeMap<String, String>,
    /// Start from an empty environment instead of the parent's.
    pub env_clear: bool,
    pub stdin: StdioMode,
    pub stdout: StdioMode,
    pub stderr: StdioMode,
}

impl Default for SpawnOptions {
    fn default() -> Self {
        Self {
            cwd: None,
            env: BTreeMap::new(),
            env_clear: false,
            stdin: StdioMode::Ignore,
            stdout: StdioMode::Pipe,
            stderr: StdioMode::Pipe,
        }
    }
}

impl SpawnOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn env_clear(mut self, clear: bool) -> Self {
        self.env_clear = clear;
        self
    }

    pub fn stdin(mut self, mode: StdioMode) -> Self {
        self.stdin = mode;
        self
    }

    pub fn stdout(mut self, mode: StdioMode) -> Self {
        self.stdout = mode;
        self
    }

    pub fn stderr(mut self, mode: StdioMode) -> Self {
        self.stderr = mode;
        self
    }
}

/// A fully-specified request to run one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: String,
    pub args: Vec<String>,
    pub options: SpawnOptions,
}

impl Invocation {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            options: SpawnOptions::default(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn options(mut self, options: SpawnOptions) -> Self {
        self.options = options;
        self
    }

    /// `command` followed by the arguments joined with single spaces.
    ///
    /// This is the form used in failure messages; it is not shell-quoted.
    pub fn full_command(&self) -> String {
        if self.args.is_empty() {
            self.command.clone()
        } else {
            format!("{} {}", self.command, self.args.join(" "))
        }
    }
}

/// Conversion from the accepted call shapes into an [`Invocation`].
pub trait IntoInvocation {
    fn into_invocation(self) -> Invocation;
}

impl IntoInvocation for Invocation {
    fn into_invocation(self) -> Invocation {
        self
    }
}

impl IntoInvocation for &str {
    fn into_invocation(self) -> Invocation {
        Invocation::new(self)
    }
}

impl IntoInvocation for String {
    fn into_invocation(self) -> Invocation {
        Invocation::new(self)
    }
}

impl<C, I, S> IntoInvocation for (C, I)
where
    C: Into<String>,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    fn into_invocation(self) -> Invocation {
        Invocation::new(self.0).args(self.1)
    }
}

impl<C> IntoInvocation for (C, SpawnOptions)
where
    C: Into<String>,
{
    fn into_invocation(self) -> Invocation {
        Invocation::new(self.0).options(self.1)
    }
}

impl<C, I, S> IntoInvocation for (C, I, SpawnOptions)
where
    C: Into<String>,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    fn into_invocation(self) -> Invocation {
        Invocation::new(self.0).args(self.1).options(self.2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_command_gets_defaults() {
        let inv = "echo".into_invocation();
        assert_eq!(inv.command, "echo");
        assert!(inv.args.is_empty());
        assert_eq!(inv.options, SpawnOptions::default());
        assert_eq!(inv.options.stdout, StdioMode::Pipe);
        assert_eq!(inv.options.stderr, StdioMode::Pipe);
    }

    #[test]
    fn options_in_args_position_are_options() {
        let opts = SpawnOptions::new().stdout(StdioMode::Ignore);
        let inv = ("hello", opts.clone()).into_invocation();
        assert!(inv.args.is_empty());
        assert_eq!(inv.options, opts);
    }

    #[test]
    fn all_three_positions() {
        let opts = SpawnOptions::new().cwd("/tmp");
        let inv = ("node", ["simple", "x"], opts.clone()).into_invocation();
        assert_eq!(inv.args, vec!["simple".to_string(), "x".to_string()]);
        assert_eq!(inv.options, opts);

        let inv = ("node", vec![String::from("a")]).into_invocation();
        assert_eq!(inv.args, vec!["a".to_string()]);
    }

    #[test]
    fn full_command_joins_args_with_spaces() {
        assert_eq!(Invocation::new("ls").full_command(), "ls");
        assert_eq!(
            Invocation::new("git").args(["commit", "-m", "x"]).full_command(),
            "git commit -m x"
        );
    }
}
