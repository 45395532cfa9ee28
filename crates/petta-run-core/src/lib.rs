//! Execution pipeline for running MeTTa snippets through the PeTTa translator.
//!
//! This crate implements the whole lifecycle of one code execution: staging the
//! submitted snippet into a uniquely named temporary file, invoking the
//! SWI-Prolog-hosted translator as a child process under a hard wall-clock
//! timeout, and normalizing its console output before it reaches the caller.
//! The design keeps the text transforms pure and the process invocation behind
//! a trait seam, so both halves can be tested without a real interpreter
//! installed on the machine.

pub mod config;
pub mod errors;
pub mod runner;
pub mod sanitize;
pub mod types;

pub use config::RunnerConfig;
pub use errors::{Result, RunnerError};
pub use runner::{CodeExecutor, PettaRunner};
pub use types::{RunRequest, RunResponse};
