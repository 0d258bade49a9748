pub mod group;
pub mod ledger;
pub mod outcome;
pub mod release;
pub mod report;

pub use group::ReleaseGroup;
pub use ledger::RetryRecord;
pub use outcome::{FailureReason, UploadOutcome};
pub use release::{Release, ReleaseId, ReleaseKind, SbomDocument};
pub use report::{RegenerationReport, ReportTotals, SelectionMode};
