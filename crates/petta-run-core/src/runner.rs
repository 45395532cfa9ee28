//! The execution pipeline: stage, invoke, normalize, respond.

use std::io::Write;
use std::process::Stdio;

use async_trait::async_trait;
use tempfile::{Builder, NamedTempFile};
use tokio::process::Command;
use tokio::time::timeout;

use crate::config::RunnerConfig;
use crate::errors::{Result, RunnerError};
use crate::sanitize::{clean_stderr, clean_stdout};
use crate::types::RunResponse;

/// Token telling the translator's file reader to suppress debug traces.
const SUPPRESS_DEBUG_ARG: &str = "nodebug";

/// Seam between the HTTP surface and the pipeline.
///
/// The router is generic over this trait so endpoint behavior can be tested
/// with a mock executor, without SWI-Prolog installed.
#[async_trait]
pub trait CodeExecutor: Send + Sync {
    /// Execute one snippet and report the outcome. Never fails at this
    /// boundary: pipeline errors are folded into the `Failed` variant.
    async fn run(&self, code: &str) -> RunResponse;
}

/// The PeTTa execution pipeline.
///
/// Stateless apart from its configuration; concurrent runs are independent
/// because each stages its own uniquely named file and spawns its own child.
#[derive(Debug, Clone)]
pub struct PettaRunner {
    config: RunnerConfig,
}

impl PettaRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Write the snippet verbatim to a fresh uniquely named temp file.
    ///
    /// The returned guard removes the file when dropped, which covers every
    /// exit path out of [`Self::execute`].
    fn stage(&self, code: &str) -> Result<NamedTempFile> {
        let mut staged = Builder::new()
            .prefix("petta-run-")
            .suffix(&self.config.staged_suffix)
            .tempfile()
            .map_err(RunnerError::Staging)?;
        staged
            .write_all(code.as_bytes())
            .map_err(RunnerError::Staging)?;
        staged.flush().map_err(RunnerError::Staging)?;
        Ok(staged)
    }

    async fn execute(&self, code: &str) -> Result<RunResponse> {
        if !self.config.entry_point.exists() {
            return Err(RunnerError::EntryPointMissing(
                self.config.entry_point.clone(),
            ));
        }

        let staged = self.stage(code)?;
        log::debug!("Staged {} bytes at {}", code.len(), staged.path().display());

        let mut command = Command::new(&self.config.interpreter);
        command
            // Quiet: no banner. `--` keeps swipl's own parser from eating
            // the user-file argument.
            .arg("-q")
            .arg("-f")
            .arg(&self.config.entry_point)
            .arg("--")
            .arg(staged.path())
            .arg(SUPPRESS_DEBUG_ARG)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = command.spawn().map_err(|source| RunnerError::Spawn {
            command: self.config.interpreter.display().to_string(),
            source,
        })?;

        // On expiry the wait future is dropped, which drops the child handle;
        // kill_on_drop then terminates the process rather than abandoning it.
        let output = timeout(self.config.timeout, child.wait_with_output())
            .await
            .map_err(|_| RunnerError::Timeout(self.config.timeout.as_secs()))??;

        let stdout = String::from_utf8(output.stdout)?;
        let stderr = String::from_utf8(output.stderr)?;
        let returncode = output.status.code().unwrap_or(-1);

        Ok(RunResponse::Completed {
            stdout: clean_stdout(&stdout),
            stderr: clean_stderr(&stderr),
            returncode,
        })
    }
}

#[async_trait]
impl CodeExecutor for PettaRunner {
    async fn run(&self, code: &str) -> RunResponse {
        match self.execute(code).await {
            Ok(response) => response,
            Err(e) => {
                log::warn!("Execution pipeline failed: {}", e);
                RunResponse::failed(e.to_string())
            }
        }
    }
}
