/// Mock implementations for testing
mod mock_release_source;
mod mock_report_sink;
mod mock_retry_ledger;
mod mock_sbom_archive;
mod mock_sbom_producer;

pub use mock_release_source::MockReleaseSource;
pub use mock_report_sink::MockReportSink;
pub use mock_retry_ledger::MockRetryLedger;
pub use mock_sbom_archive::MockSbomArchive;
pub use mock_sbom_producer::MockSbomProducer;
