// src/launcher.rs

//! Process creation via `tokio::process::Command`.

use std::process::Stdio;

use tokio::process::{Child, Command};
use tracing::debug;

use crate::errors::{ExecError, Result};
use crate::invocation::{Invocation, SpawnOptions};
use crate::types::StdioMode;

fn stdio(mode: StdioMode) -> Stdio {
    match mode {
        StdioMode::Pipe => Stdio::piped(),
        StdioMode::Ignore => Stdio::null(),
        StdioMode::Inherit => Stdio::inherit(),
    }
}

/// Build the command for `program` (the resolved executable) with the
/// invocation's arguments and options applied.
pub fn build_command(program: &str, invocation: &Invocation) -> Command {
    let SpawnOptions {
        cwd,
        env,
        env_clear,
        stdin,
        stdout,
        stderr,
    } = &invocation.options;

    let mut cmd = Command::new(program);
    cmd.args(&invocation.args);

    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    if *env_clear {
        cmd.env_clear();
    }
    cmd.envs(env);

    cmd.stdin(stdio(*stdin))
        .stdout(stdio(*stdout))
        .stderr(stdio(*stderr));

    cmd
}

/// Launch the process. A failure here means the process never started.
pub fn launch(program: &str, invocation: &Invocation) -> Result<Child> {
    let mut cmd = build_command(program, invocation);

    let child = cmd.spawn().map_err(|source| ExecError::Spawn {
        command: invocation.command.clone(),
        source,
    })?;

    debug!(
        command = %invocation.command,
        program,
        pid = ?child.id(),
        "process launched"
    );

    Ok(child)
}
