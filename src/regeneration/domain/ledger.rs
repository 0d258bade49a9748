use crate::regeneration::domain::{ReleaseId, ReleaseKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted record of a release whose delivery has failed.
///
/// Created on the first failure, updated on each subsequent failure,
/// deleted on successful delivery. The ledger is the single source of
/// truth for "which releases still owe an SBOM". Records must stay valid
/// under overlapping runs: the key space is release identity and
/// last-write-wins per key is acceptable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryRecord {
    pub release_id: ReleaseId,
    pub kind: ReleaseKind,
    pub first_failed_at: DateTime<Utc>,
    pub last_attempt_at: DateTime<Utc>,
    pub attempt_count: u32,
}

impl RetryRecord {
    /// Record for a release failing delivery for the first time.
    pub fn first_failure(release_id: ReleaseId, kind: ReleaseKind, now: DateTime<Utc>) -> Self {
        Self {
            release_id,
            kind,
            first_failed_at: now,
            last_attempt_at: now,
            attempt_count: 1,
        }
    }

    /// Fold another failed attempt into an existing record.
    ///
    /// `first_failed_at` is preserved; only the attempt bookkeeping moves.
    /// This is the merge rule that makes ledger upserts idempotent per key.
    pub fn record_attempt(&mut self, now: DateTime<Utc>) {
        self.last_attempt_at = now;
        self.attempt_count = self.attempt_count.saturating_add(1);
    }
}
