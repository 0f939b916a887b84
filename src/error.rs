//! Exit codes and error reporting.

/// How a run ended.
///
/// An interrupted run is a clean exit: whatever was written to the run log
/// stays, and the process status is 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// The run completed (with or without duplicates).
    Success,
    /// There was nothing to hash.
    NothingToProcess,
    /// The run was interrupted by the user (Ctrl+C).
    Interrupted,
    /// A fatal error stopped the run.
    GeneralError,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Success | Self::NothingToProcess | Self::Interrupted => 0,
            Self::GeneralError => 1,
        }
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DS000",
            Self::GeneralError => "DS001",
            Self::NothingToProcess => "DS002",
            Self::Interrupted => "DS130",
        }
    }
}

/// Format an error and its causes for stderr.
#[must_use]
pub fn format_error(err: &anyhow::Error, code: ExitCode) -> String {
    format!("[{}] Error: {:#}", code.code_prefix(), err)
}
