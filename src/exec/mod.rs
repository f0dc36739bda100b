// src/exec/mod.rs

//! Buffered process execution.
//!
//! - [`executor`] owns [`BufferedExecutor`]: resolve the command, launch it,
//!   and hand the child to an [`Execution`].
//! - [`execution`] drives one child to close and produces the outcome.
//! - [`accumulate`] holds the per-channel byte buffers and progress fan-out.
//! - [`callback`] adapts an execution to a completion handler.

pub mod accumulate;
pub mod callback;
pub mod execution;
pub mod executor;

pub use accumulate::{ChannelBuffer, ProgressSink};
pub use callback::Delivery;
pub use execution::{Execution, Output, ProcessHandle};
pub use executor::BufferedExecutor;
