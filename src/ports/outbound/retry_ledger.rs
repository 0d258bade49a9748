use crate::regeneration::domain::{ReleaseId, ReleaseKind, RetryRecord};
use crate::shared::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// RetryLedger port over the durable record of failed deliveries
///
/// Backed by external durable storage (an object store or equivalent).
/// The ledger is the single source of truth for "which releases still
/// owe an SBOM". It tolerates being read and written by overlapping
/// runs: mutations are per-key and last-write-wins on a given release
/// identity, and no local lock is assumed to protect it across process
/// boundaries.
#[async_trait]
pub trait RetryLedger: Send + Sync {
    /// Verifies the ledger is reachable. Called once at startup; a
    /// failure is run-fatal.
    async fn ping(&self) -> Result<()>;

    /// Fetches records whose first failure falls within `[since, until)`.
    async fn get_between(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<RetryRecord>>;

    /// Fetches the records for the given release identifiers, skipping
    /// identifiers with no record.
    async fn get(&self, ids: &[ReleaseId]) -> Result<Vec<RetryRecord>>;

    /// Inserts or updates the record for a release that failed delivery.
    ///
    /// Idempotent per key: a second call for the same release updates
    /// `last_attempt_at` and increments `attempt_count` instead of
    /// creating a duplicate entry. Returns the stored record.
    async fn upsert(&self, release_id: &ReleaseId, kind: ReleaseKind) -> Result<RetryRecord>;

    /// Deletes the record for a release after successful delivery.
    ///
    /// Removing a non-existent key is a no-op, not an error: a
    /// concurrent successful run may have removed it first.
    async fn remove(&self, release_id: &ReleaseId) -> Result<()>;
}
