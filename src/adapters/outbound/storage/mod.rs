pub mod s3_release_source;
pub mod s3_retry_ledger;
pub mod s3_store;

pub use s3_release_source::S3ReleaseSource;
pub use s3_retry_ledger::S3RetryLedger;
pub use s3_store::{build_client, S3Settings};
