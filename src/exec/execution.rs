// src/exec/execution.rs

//! The in-flight side of a buffered run.
//!
//! [`spawn_execution`] takes a freshly launched child and moves it into its own
//! Tokio task. That task:
//!
//! - drains stdout and stderr concurrently, each into its own buffer,
//! - reaps the child, forwarding any kill request from a [`ProcessHandle`],
//! - and only once *both* channels hit EOF *and* the child is reaped, turns
//!   the buffers into an [`Output`] or a [`CommandFailure`].
//!
//! Waiting for the streams as well as the exit status is what guarantees the
//! buffers are complete; a short-lived process can exit before its last
//! bytes have been read.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::process::Child;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::errors::{CommandFailure, ExecError, Result};
use crate::exec::accumulate::{ChannelBuffer, ProgressSink, drain};
use crate::types::{Channel, ExitCode};

/// Buffered output of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Output {
    pub stdout: String,
    pub stderr: String,
}

/// Control handle for the underlying process.
///
/// Cheap to clone; stays valid after the process is gone (requests are then
/// simply not delivered).
#[derive(Debug, Clone)]
pub struct ProcessHandle {
    pid: Option<u32>,
    kill_tx: mpsc::UnboundedSender<()>,
}

impl ProcessHandle {
    /// OS process id, if the platform reported one.
    pub fn id(&self) -> Option<u32> {
        self.pid
    }

    /// Ask for the process to be killed.
    ///
    /// Returns `false` if the execution already completed. A killed process
    /// still resolves its execution, as a non-zero exit.
    pub fn kill(&self) -> bool {
        self.kill_tx.send(()).is_ok()
    }

    /// Whether the process has been reaped.
    pub fn is_finished(&self) -> bool {
        self.kill_tx.is_closed()
    }
}

/// A pending buffered run.
///
/// Resolves exactly once to the buffered [`Output`] or an [`ExecError`].
/// Dropping it does not stop the process; the background task still runs to
/// completion and reaps the child.
#[derive(Debug)]
pub struct Execution {
    handle: ProcessHandle,
    task: JoinHandle<Result<Output>>,
}

impl Execution {
    pub fn process(&self) -> &ProcessHandle {
        &self.handle
    }

    pub fn id(&self) -> Option<u32> {
        self.handle.id()
    }

    pub fn kill(&self) -> bool {
        self.handle.kill()
    }
}

impl Future for Execution {
    type Output = Result<Output>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.task).poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            Poll::Ready(Err(join_err)) => {
                Poll::Ready(Err(ExecError::Io(std::io::Error::other(join_err))))
            }
        }
    }
}

/// Move `child` into a background task and return the pending execution.
pub(crate) fn spawn_execution(
    child: Child,
    full_command: String,
    progress: Option<ProgressSink>,
) -> Execution {
    let (kill_tx, kill_rx) = mpsc::unbounded_channel();
    let handle = ProcessHandle {
        pid: child.id(),
        kill_tx,
    };

    let task = tokio::spawn(run_to_close(child, full_command, progress, kill_rx));

    Execution { handle, task }
}

async fn run_to_close(
    mut child: Child,
    full_command: String,
    progress: Option<ProgressSink>,
    kill_rx: mpsc::UnboundedReceiver<()>,
) -> Result<Output> {
    let pid = child.id();
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let streams = async {
        tokio::join!(
            drain(stdout, ChannelBuffer::new(Channel::Stdout, progress.clone())),
            drain(stderr, ChannelBuffer::new(Channel::Stderr, progress.clone())),
        )
    };

    let ((out, err), status) = tokio::join!(streams, reap(&mut child, pid, kill_rx));

    let out = out?;
    let err = err?;
    let exit = ExitCode::from(status?);

    let stdout = out.into_text();
    let stderr = err.into_text();

    if exit.success() {
        debug!(command = %full_command, ?pid, "process closed successfully");
        return Ok(Output { stdout, stderr });
    }

    info!(command = %full_command, ?pid, exit = %exit, "process closed with failure");
    Err(CommandFailure::new(full_command, exit, stdout, stderr).into())
}

/// Wait for the child to exit, killing it whenever asked to.
async fn reap(
    child: &mut Child,
    pid: Option<u32>,
    mut kill_rx: mpsc::UnboundedReceiver<()>,
) -> std::io::Result<std::process::ExitStatus> {
    let mut listening = true;

    let status = loop {
        tokio::select! {
            status = child.wait() => break status,

            request = kill_rx.recv(), if listening => {
                match request {
                    Some(()) => {
                        info!(?pid, "kill requested; terminating process");
                        if let Err(e) = child.start_kill() {
                            warn!(?pid, error = %e, "failed to kill process");
                        }
                    }
                    // Every handle is gone; nobody can ask any more.
                    None => listening = false,
                }
            }
        }
    };

    kill_rx.close();
    status
}
