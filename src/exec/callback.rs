// src/exec/callback.rs

//! Completion-handler adapter over [`Execution`](crate::Execution).
//!
//! The handler receives the outcome exactly once, spawn failures included.
//! It always runs on a task of its own, after the execution has fully
//! resolved: a panic inside it never reaches the execution that produced the
//! outcome. The panic stays observable through [`Delivery::join`]; when the
//! [`Delivery`] is dropped, Tokio reports it like any other detached task.

use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, warn};

use crate::errors::Result;
use crate::exec::execution::{Output, ProcessHandle};
use crate::exec::executor::BufferedExecutor;
use crate::invocation::IntoInvocation;

/// The pending hand-off of an outcome to a completion handler.
///
/// Dropping it detaches the handler task; the handler still runs.
#[derive(Debug)]
pub struct Delivery {
    process: Option<ProcessHandle>,
    task: JoinHandle<()>,
}

impl Delivery {
    /// Handle on the running process, or `None` when it could not be
    /// spawned (the handler then receives the spawn error).
    pub fn process(&self) -> Option<&ProcessHandle> {
        self.process.as_ref()
    }

    /// Wait until the handler has returned.
    ///
    /// A panicking handler yields a [`JoinError`] for which
    /// [`is_panic`](JoinError::is_panic) holds.
    pub async fn join(self) -> std::result::Result<(), JoinError> {
        let result = self.task.await;
        if let Err(e) = &result {
            if e.is_panic() {
                warn!(error = %e, "completion handler panicked");
            }
        }
        result
    }
}

impl BufferedExecutor {
    /// Run the invocation and deliver its outcome to `handler`.
    pub fn execute_with_callback<F>(&self, invocation: impl IntoInvocation, handler: F) -> Delivery
    where
        F: FnOnce(Result<Output>) + Send + 'static,
    {
        match self.execute(invocation) {
            Ok(execution) => {
                let process = execution.process().clone();
                let task = tokio::spawn(async move {
                    let outcome = execution.await;
                    handler(outcome);
                });
                Delivery {
                    process: Some(process),
                    task,
                }
            }
            Err(err) => {
                debug!(error = %err, "spawn failed; delivering error to handler");
                Delivery {
                    process: None,
                    task: tokio::spawn(async move { handler(Err(err)) }),
                }
            }
        }
    }
}
