//! Configuration for the execution pipeline.

use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the PeTTa execution pipeline.
///
/// The entry point is injected here rather than recomputed from the process's
/// install location, so the pipeline stays relocatable and testable.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Interpreter binary hosting the translator (resolved via PATH if bare).
    pub interpreter: PathBuf,
    /// The translator's main Prolog file, loaded before the user code.
    pub entry_point: PathBuf,
    /// Suffix given to staged code files.
    pub staged_suffix: String,
    /// Hard wall-clock limit on one execution.
    pub timeout: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            interpreter: PathBuf::from("swipl"),
            entry_point: PathBuf::from("petta/src/main.pl"),
            staged_suffix: ".metta".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl RunnerConfig {
    /// Create a configuration for the given translator entry point.
    pub fn new(entry_point: impl Into<PathBuf>) -> Self {
        Self {
            entry_point: entry_point.into(),
            ..Self::default()
        }
    }

    /// Set the interpreter binary.
    pub fn with_interpreter(mut self, interpreter: impl Into<PathBuf>) -> Self {
        self.interpreter = interpreter.into();
        self
    }

    /// Set the translator entry point.
    pub fn with_entry_point(mut self, entry_point: impl Into<PathBuf>) -> Self {
        self.entry_point = entry_point.into();
        self
    }

    /// Set the suffix for staged code files.
    pub fn with_staged_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.staged_suffix = suffix.into();
        self
    }

    /// Set the execution timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
