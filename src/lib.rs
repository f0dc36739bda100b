// src/lib.rs

//! Spawn a process, buffer its stdout and stderr in full, and get both back
//! once it has closed.
//!
//! ```no_run
//! # async fn demo() -> buffspawn::Result<()> {
//! let out = buffspawn::execute(("git", ["status", "--short"]))?.await?;
//! println!("{}", out.stdout);
//! # Ok(())
//! # }
//! ```
//!
//! A non-zero exit fails with [`ExecError::Command`] (code `ECMDERR`), which
//! carries the exit code and both captured streams; a process that cannot be
//! started at all fails immediately with [`ExecError::Spawn`].

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod invocation;
pub mod launcher;
pub mod logging;
pub mod resolve;
pub mod types;

use std::io::Write;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{ConfigFile, Overrides, default_config_path, load_and_validate, parse_env_pair};

pub use errors::{CommandFailure, ConfigError, ECMDERR, ExecError, Result};
pub use exec::{BufferedExecutor, Delivery, Execution, Output, ProcessHandle, ProgressSink};
pub use invocation::{IntoInvocation, Invocation, SpawnOptions};
pub use resolve::{ExecutableResolver, ResolveMode};
pub use types::{Channel, ExitCode, Progress, StdioMode};

/// Run `invocation` on the process-wide [`BufferedExecutor`].
///
/// Accepts `"cmd"`, `("cmd", args)`, `("cmd", options)` or
/// `("cmd", args, options)`. Must be called from within a Tokio runtime.
pub fn execute(invocation: impl IntoInvocation) -> Result<Execution> {
    BufferedExecutor::global().execute(invocation)
}

/// Like [`execute`], forwarding each chunk to `progress` as it is buffered.
pub fn execute_with_progress(
    invocation: impl IntoInvocation,
    progress: ProgressSink,
) -> Result<Execution> {
    BufferedExecutor::global().execute_with_progress(invocation, progress)
}

/// Like [`execute`], delivering the outcome to `handler` instead.
pub fn execute_with_callback<F>(invocation: impl IntoInvocation, handler: F) -> Delivery
where
    F: FnOnce(Result<Output>) + Send + 'static,
{
    BufferedExecutor::global().execute_with_callback(invocation, handler)
}

/// Exit code used by the CLI when the command could not be started.
pub const EXIT_SPAWN_FAILURE: i32 = 127;

/// High-level entry point used by `main.rs`.
///
/// Returns the exit code the CLI should terminate with.
pub async fn run(args: CliArgs) -> anyhow::Result<i32> {
    let profile = load_profile(&args)?;

    let mut env = Vec::with_capacity(args.env.len());
    for pair in &args.env {
        env.push(parse_env_pair(pair)?);
    }

    let overrides = Overrides {
        cwd: args.cwd.clone(),
        env,
        stdout: args.stdout.map(Into::into),
        stderr: args.stderr.map(Into::into),
    };
    let options = overrides.apply(profile.into_options());
    let invocation = Invocation::new(&args.command)
        .args(&args.args)
        .options(options);

    let executor = BufferedExecutor::global();
    let execution = if args.progress {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(log_progress(rx));
        executor.execute_with_progress(invocation, tx)
    } else {
        executor.execute(invocation)
    };

    let outcome = match execution {
        Ok(execution) => execution.await,
        Err(err) => {
            eprintln!("buffspawn: {err}");
            return Ok(EXIT_SPAWN_FAILURE);
        }
    };

    match outcome {
        Ok(output) => {
            print_output(&output.stdout, &output.stderr)?;
            Ok(0)
        }
        Err(ExecError::Command(failure)) => {
            print_output(failure.stdout(), failure.stderr())?;
            eprintln!("buffspawn: {failure}");
            Ok(failure.status().filter(|c| *c != 0).unwrap_or(1))
        }
        Err(err) => Err(err).context("running command"),
    }
}

/// Explicit `--config`, else `buffspawn.toml` if present, else defaults.
fn load_profile(args: &CliArgs) -> anyhow::Result<ConfigFile> {
    if let Some(ref path) = args.config {
        return load_and_validate(path)
            .with_context(|| format!("loading config file at {:?}", path));
    }

    let fallback = default_config_path();
    if fallback.is_file() {
        info!(path = ?fallback, "using default config file");
        return load_and_validate(&fallback)
            .with_context(|| format!("loading config file at {:?}", fallback));
    }

    Ok(ConfigFile::default())
}

async fn log_progress(mut rx: mpsc::UnboundedReceiver<Progress>) {
    while let Some(event) = rx.recv().await {
        debug!(
            channel = %event.channel,
            bytes = event.chunk.len(),
            "{}",
            String::from_utf8_lossy(&event.chunk).trim_end()
        );
    }
}

fn print_output(stdout: &str, stderr: &str) -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    out.write_all(stdout.as_bytes())?;
    out.flush()?;

    let mut err = std::io::stderr().lock();
    err.write_all(stderr.as_bytes())?;
    err.flush()?;
    Ok(())
}
