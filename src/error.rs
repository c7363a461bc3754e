//! Structured error handling and exit codes.

use serde::Serialize;

/// Exit codes for the testpick application.
///
/// - 0: Success (a file was selected and printed)
/// - 1: General error (unexpected failure)
/// - 2: No selection (the picker was cancelled)
/// - 3: No candidates (no test files were found)
/// - 130: Interrupted by a signal (SIGINT, SIGTERM, SIGHUP)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: A file was selected.
    Success = 0,
    /// General error: An unexpected error occurred.
    GeneralError = 1,
    /// No selection: The user cancelled, or accepted with nothing to accept.
    NoSelection = 2,
    /// No candidates: Discovery found no test files.
    NoCandidates = 3,
    /// Interrupted: The picker was stopped by a shutdown signal.
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "TP000",
            Self::GeneralError => "TP001",
            Self::NoSelection => "TP002",
            Self::NoCandidates => "TP003",
            Self::Interrupted => "TP130",
        }
    }

    /// Pick the exit code for an application error.
    ///
    /// Interruptions surface as [`TuiError::Interrupted`](crate::tui::TuiError)
    /// anywhere in the error chain; everything else is a general error.
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        let interrupted = err.chain().any(|cause| {
            cause
                .downcast_ref::<crate::tui::TuiError>()
                .is_some_and(|e| matches!(e, crate::tui::TuiError::Interrupted))
        });
        if interrupted {
            Self::Interrupted
        } else {
            Self::GeneralError
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "TP001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Whether the operation was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::TuiError;
    use anyhow::Context;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::GeneralError.as_i32(), 1);
        assert_eq!(ExitCode::NoSelection.as_i32(), 2);
        assert_eq!(ExitCode::NoCandidates.as_i32(), 3);
        assert_eq!(ExitCode::Interrupted.as_i32(), 130);
    }

    #[test]
    fn test_code_prefixes() {
        assert_eq!(ExitCode::Success.code_prefix(), "TP000");
        assert_eq!(ExitCode::NoSelection.code_prefix(), "TP002");
        assert_eq!(ExitCode::Interrupted.code_prefix(), "TP130");
    }

    #[test]
    fn test_for_error_detects_interrupt_in_chain() {
        let err = Err::<(), _>(TuiError::Interrupted)
            .context("picker failed")
            .unwrap_err();
        assert_eq!(ExitCode::for_error(&err), ExitCode::Interrupted);

        let err = anyhow::anyhow!("boom");
        assert_eq!(ExitCode::for_error(&err), ExitCode::GeneralError);
    }

    #[test]
    fn test_structured_error_json() {
        let err = anyhow::anyhow!("no such directory");
        let structured = StructuredError::new(&err, ExitCode::GeneralError);
        let json = serde_json::to_value(&structured).unwrap();

        assert_eq!(json["code"], "TP001");
        assert_eq!(json["exit_code"], 1);
        assert_eq!(json["message"], "no such directory");
        assert_eq!(json["interrupted"], false);
    }
}
