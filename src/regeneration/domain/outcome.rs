use serde::{Deserialize, Serialize};

/// Why a release's delivery failed.
///
/// The reason tag determines ledger handling (every `Failed` outcome
/// enters the retry ledger) and tells an operator whether to wait for
/// ledger-driven outage recovery or re-run with an explicit list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    /// The SBOM producer could not build a document for the release.
    Produce { details: String },
    /// Authentication failed twice in a row (stale credentials or a
    /// revoked client).
    Auth,
    /// Retryable delivery errors (network, timeout, 5xx) exhausted the
    /// attempt budget.
    Transient,
    /// The archive rejected the document with a non-retryable status.
    Rejected { status: u16 },
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::Produce { details } => write!(f, "produce: {}", details),
            FailureReason::Auth => write!(f, "auth"),
            FailureReason::Transient => write!(f, "transient"),
            FailureReason::Rejected { status } => write!(f, "rejected (status {})", status),
        }
    }
}

/// Per-release result, produced exactly once per release per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum UploadOutcome {
    /// The archive durably accepted the document (or already held it).
    Delivered,
    /// The release still owes an SBOM; it enters the retry ledger.
    Failed { reason: FailureReason },
    /// Nothing to deliver: the producer declined, or the run was dry.
    Skipped { reason: String },
}

impl UploadOutcome {
    pub fn failed(reason: FailureReason) -> Self {
        UploadOutcome::Failed { reason }
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        UploadOutcome::Skipped {
            reason: reason.into(),
        }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, UploadOutcome::Delivered)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, UploadOutcome::Failed { .. })
    }
}
