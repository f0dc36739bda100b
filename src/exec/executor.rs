// src/exec/executor.rs

//! Buffered executor: resolve, launch, hand off to an [`Execution`].

use std::sync::{Arc, OnceLock};

use tracing::{debug, info};

use crate::errors::Result;
use crate::exec::accumulate::ProgressSink;
use crate::exec::execution::{Execution, spawn_execution};
use crate::invocation::IntoInvocation;
use crate::launcher;
use crate::resolve::ExecutableResolver;

/// Runs commands to completion, buffering their output.
///
/// Owns (a shared reference to) the resolver cache; clones share it.
#[derive(Debug, Clone)]
pub struct BufferedExecutor {
    resolver: Arc<ExecutableResolver>,
}

impl BufferedExecutor {
    /// Executor with a fresh resolver for the running platform.
    pub fn new() -> Self {
        Self::with_resolver(Arc::new(ExecutableResolver::new()))
    }

    pub fn with_resolver(resolver: Arc<ExecutableResolver>) -> Self {
        Self { resolver }
    }

    /// Process-wide executor used by [`crate::execute`].
    ///
    /// Its resolver cache lives until the process exits and is never cleared.
    pub fn global() -> &'static BufferedExecutor {
        static GLOBAL: OnceLock<BufferedExecutor> = OnceLock::new();
        GLOBAL.get_or_init(BufferedExecutor::new)
    }

    pub fn resolver(&self) -> &ExecutableResolver {
        &self.resolver
    }

    /// Launch the invocation and return the pending execution.
    ///
    /// Fails right away with [`crate::ExecError::Spawn`] when the process
    /// cannot be created. Must be called from within a Tokio runtime.
    pub fn execute(&self, invocation: impl IntoInvocation) -> Result<Execution> {
        self.launch(invocation, None)
    }

    /// Like [`execute`](Self::execute), also forwarding every buffered chunk
    /// to `progress` as it arrives.
    pub fn execute_with_progress(
        &self,
        invocation: impl IntoInvocation,
        progress: ProgressSink,
    ) -> Result<Execution> {
        self.launch(invocation, Some(progress))
    }

    fn launch(
        &self,
        invocation: impl IntoInvocation,
        progress: Option<ProgressSink>,
    ) -> Result<Execution> {
        let invocation = invocation.into_invocation();
        let child_path = invocation.options.env.get("PATH").map(String::as_str);
        let program = self
            .resolver
            .resolve_with_path(&invocation.command, child_path);
        let full_command = invocation.full_command();

        if program != invocation.command {
            debug!(command = %invocation.command, program = %program, "command resolved");
        }

        info!(
            command = %full_command,
            stdout = %invocation.options.stdout,
            stderr = %invocation.options.stderr,
            "starting buffered process"
        );

        let child = launcher::launch(&program, &invocation)?;
        Ok(spawn_execution(child, full_command, progress))
    }
}

impl Default for BufferedExecutor {
    fn default() -> Self {
        Self::new()
    }
}
