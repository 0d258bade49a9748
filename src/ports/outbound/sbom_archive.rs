use crate::regeneration::domain::{SbomDocument, UploadOutcome};
use crate::shared::Result;
use async_trait::async_trait;

/// SbomArchive port for delivering documents to the trusted store
///
/// The upload is idempotent by release identity: delivering the same
/// document twice leaves the archive in the same state. Implementations
/// own authentication, failure classification and in-run retries; the
/// returned outcome is final for this run.
#[async_trait]
pub trait SbomArchive: Send + Sync {
    /// Delivers a document, classifying the transport result.
    ///
    /// # Errors
    /// Implementations convert delivery failures into
    /// `UploadOutcome::Failed` values. An `Err` is reserved for
    /// infrastructure faults that are not attributable to the document,
    /// and is treated by the caller like a failed delivery.
    async fn upload(&self, document: &SbomDocument) -> Result<UploadOutcome>;
}
