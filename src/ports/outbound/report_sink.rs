use crate::regeneration::domain::RegenerationReport;
use crate::shared::Result;
use async_trait::async_trait;

/// ReportSink port for publishing the run report
///
/// Publication must be atomic from the reader's point of view: the
/// report never partially appears at its final location.
#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn publish(&self, report: &RegenerationReport) -> Result<()>;
}
