//! Error types for the execution pipeline.
//!
//! Internally the pipeline distinguishes its failure modes so logs stay
//! diagnosable; at the HTTP boundary every variant is flattened into the
//! `error` string of [`crate::types::RunResponse::Failed`].

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, RunnerError>;

/// Errors the pipeline itself can hit while trying to run a snippet.
///
/// Interpreter-reported failures (nonzero exit code, stderr output) are not
/// errors at this level; they travel back to the caller inside the completed
/// response.
#[derive(Error, Debug)]
pub enum RunnerError {
    /// The translator's main Prolog file is missing; nothing was spawned.
    #[error("PeTTa entry point not found at {}", .0.display())]
    EntryPointMissing(PathBuf),

    /// Could not create or write the staged code file.
    #[error("Failed to stage code to a temporary file: {0}")]
    Staging(std::io::Error),

    /// The interpreter binary could not be launched.
    #[error("Failed to spawn interpreter '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    /// The child outlived the wall-clock limit and was killed.
    #[error("Execution timed out after {0}s")]
    Timeout(u64),

    /// The interpreter wrote bytes that are not valid UTF-8.
    #[error("Interpreter produced non-UTF-8 output: {0}")]
    OutputDecoding(#[from] std::string::FromUtf8Error),

    /// Any other I/O failure while waiting on the child.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
