use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// Per-release failures are reported, not fatal: a run that completes
/// exits 0 even when individual releases failed. Non-zero codes are
/// reserved for run-fatal conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// The run completed and a report was published (individual releases
    /// may still have failed; the report enumerates them).
    Success = 0,
    /// A run-fatal condition aborted the run before/without a report.
    RunFatal = 1,
    /// Invalid command-line arguments (clap parsing or validation errors).
    InvalidArguments = 2,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::RunFatal => write!(f, "Run Fatal (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
        }
    }
}

/// Run-fatal errors for SBOM regeneration.
///
/// Only conditions that invalidate the whole run live here. Per-release
/// failures (producer errors, delivery errors) are converted into
/// `UploadOutcome::Failed` values and never surface as `RegenError`.
#[derive(Debug, Error)]
pub enum RegenError {
    #[error("Release source unavailable: {details}\nNo partial progress is meaningful if the candidate set cannot be determined.")]
    SourceUnavailable { details: String },

    #[error("Retry ledger unreachable at startup: {details}")]
    LedgerUnreachable { details: String },

    #[error("Invalid selection arguments: {reason}")]
    InvalidSelection { reason: String },

    #[error("Failed to read release-id file: {path}\nDetails: {details}")]
    ReleaseIdFileError { path: PathBuf, details: String },

    #[error("Failed to publish report to: {path}\nDetails: {details}")]
    ReportPublishError { path: PathBuf, details: String },

    #[error("Invalid configuration: {reason}")]
    Configuration { reason: String },
}
