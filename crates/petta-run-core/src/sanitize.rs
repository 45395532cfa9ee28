//! Pure text transforms applied to interpreter output.
//!
//! The translator layered on SWI-Prolog colors its output and interleaves it
//! with internal trace lines, and tends to print a result twice in direct
//! succession (once from an implicit test assertion, once from the result
//! listing). These functions undo all of that without ever touching a
//! process, so they can be tested in isolation.

use once_cell::sync::Lazy;
use regex::Regex;

/// VT100 CSI escape sequences: ESC `[`, parameter bytes, intermediate bytes,
/// one final byte.
static ANSI_ESCAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\x1B\[[0-?]*[ -/]*[@-~]").unwrap());

/// Prefixes marking translator trace lines that must never reach the caller.
const TRACE_PREFIXES: [&str; 3] = ["-->", ":-", "^"];

/// Remove ANSI color/control sequences. Idempotent on clean text.
pub fn strip_ansi(text: &str) -> String {
    ANSI_ESCAPE.replace_all(text, "").into_owned()
}

/// Clean captured stdout for the caller.
///
/// Strips escapes, trims every line, drops empty and trace-prefixed lines,
/// and collapses a line that immediately repeats the previous surviving line.
/// Non-adjacent repeats are preserved.
pub fn clean_stdout(raw: &str) -> String {
    let stripped = strip_ansi(raw);
    let mut kept: Vec<&str> = Vec::new();
    for line in stripped.trim().split('\n') {
        let line = line.trim();
        if line.is_empty() || TRACE_PREFIXES.iter().any(|prefix| line.starts_with(prefix)) {
            continue;
        }
        if kept.last() == Some(&line) {
            continue;
        }
        kept.push(line);
    }
    kept.join("\n")
}

/// Clean captured stderr: escapes and surrounding whitespace only. Line
/// content is passed through untouched so Prolog error locations survive.
pub fn clean_stderr(raw: &str) -> String {
    strip_ansi(raw).trim().to_string()
}
