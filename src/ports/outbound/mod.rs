/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces the pipeline core uses to reach
/// external systems (release store, SBOM producer, archive API, retry
/// ledger, report destination).
pub mod release_source;
pub mod report_sink;
pub mod retry_ledger;
pub mod sbom_archive;
pub mod sbom_producer;

pub use release_source::ReleaseSource;
pub use report_sink::ReportSink;
pub use retry_ledger::RetryLedger;
pub use sbom_archive::SbomArchive;
pub use sbom_producer::SbomProducer;
