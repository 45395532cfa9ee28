//! Wire types shared between the pipeline and the HTTP surface.

use serde::{Deserialize, Serialize};

/// Body of a `POST /run` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRequest {
    /// MeTTa source to execute. May be empty.
    pub code: String,
}

/// Outcome of one execution, as reported to the caller.
///
/// The two variants are mutually exclusive on the wire: a completed run
/// carries `stdout`/`stderr`/`returncode`, a pipeline failure carries only
/// `error`. A run whose code misbehaved (nonzero exit, stderr output) is
/// still `Completed`; `Failed` means the pipeline could not run the code at
/// all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RunResponse {
    Completed {
        stdout: String,
        stderr: String,
        returncode: i32,
    },
    Failed {
        error: String,
    },
}

impl RunResponse {
    /// Build the failure variant from any displayable error.
    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            error: error.into(),
        }
    }

    /// True when this is the failure shape.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}
