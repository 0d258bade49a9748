use crate::regeneration::domain::{Release, SbomDocument};
use crate::shared::Result;
use async_trait::async_trait;

/// SbomProducer port for building SBOM documents
///
/// The producer is a black box: document construction, package matching
/// and image introspection all live behind this interface. The pipeline
/// only cares about getting bytes to deliver.
///
/// Failures are per-release and independent: one release's producer
/// error never aborts the run. The caller converts errors into a
/// `Failed` outcome with a produce reason and continues.
#[async_trait]
pub trait SbomProducer: Send + Sync {
    /// Produces the SBOM document for a release.
    ///
    /// Returns `Ok(None)` when the release legitimately needs no
    /// document; the caller records a `Skipped` outcome.
    ///
    /// # Errors
    /// Returns an error when the underlying generator/augmenter cannot
    /// build a document (e.g. source image metadata missing).
    async fn produce(&self, release: &Release) -> Result<Option<SbomDocument>>;
}
