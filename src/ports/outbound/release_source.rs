use crate::regeneration::domain::{Release, ReleaseId, ReleaseKind};
use crate::shared::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// ReleaseSource port for enumerating tracked releases
///
/// This port abstracts the external release-tracking store, typically
/// backed by an object-storage index of prior release events. Both
/// operations are pure reads with no caching: each call reflects current
/// remote state.
///
/// A failure here is run-fatal for the caller. No partial progress is
/// meaningful if the candidate set cannot be determined.
///
/// Implementations must be `Send + Sync` to support concurrent access.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Enumerates releases of the given kind created within
    /// `[since, until)`.
    ///
    /// The interval is half-open: a release created exactly at `since`
    /// is included, one created exactly at `until` is excluded.
    ///
    /// # Errors
    /// Returns an error if the backing store cannot be reached.
    async fn releases_between(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
        kind: ReleaseKind,
    ) -> Result<Vec<Release>>;

    /// Resolves explicit identifiers against the store.
    ///
    /// Identifiers unknown to the store are absent from the result
    /// rather than being an error; the caller decides how to treat the
    /// gap.
    async fn releases_by_id(&self, ids: &[ReleaseId]) -> Result<Vec<Release>>;
}
