//! Error reporting and exit codes for CLI output
//!
//! ## Exit Code Semantics
//!
//! | Exit Code | Meaning |
//! |-----------|---------|
//! | 0 | Success: report written |
//! | 1 | Failure: the run aborted, no report written |
//! | 2 | Usage error (reported by argument parsing) |
//!
//! Every failure is printed as a single `Error: ...` line on stderr. Expected
//! pipeline errors never show a backtrace or internal state.

use std::io::Write;
use std::process;

use scoresheet_core::ReportError;

/// Exit codes for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success: report written
    Success = 0,
    /// Failure: the run aborted
    Failure = 1,
}

impl ExitCode {
    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Success)
    }

    pub fn code(self) -> i32 {
        self as i32
    }
}

impl From<ExitCode> for process::ExitCode {
    fn from(code: ExitCode) -> Self {
        process::ExitCode::from(code as u8)
    }
}

/// Render an error as the single line shown to the user
pub fn error_line(err: &anyhow::Error) -> String {
    match err.downcast_ref::<ReportError>() {
        Some(report) => match report.hint() {
            Some(hint) => format!("Error: {report} (hint: {hint})"),
            None => format!("Error: {report}"),
        },
        // alternate form joins the context chain on one line
        None => format!("Error: {err:#}"),
    }
}

/// Write the error line and return the matching exit code
pub fn emit_error<W: Write>(writer: &mut W, err: &anyhow::Error) -> ExitCode {
    // Nothing sensible left to do if stderr itself is gone
    let _ = writeln!(writer, "{}", error_line(err));
    ExitCode::Failure
}
