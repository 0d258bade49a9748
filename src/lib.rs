//! sbom-regen - batch regeneration and archival of SBOM documents
//!
//! Ensures every tracked release eventually has its SBOM documents in
//! the central archive, even when the archive was unavailable at
//! release time. Runs operate in bulk: a selection strategy populates
//! a candidate release set, each release is regenerated and delivered
//! as an independent unit of work, and the outcomes land in one
//! deterministic report. Delivery is at-least-once; the archive
//! deduplicates by release identity.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture:
//!
//! - **Domain Layer** (`regeneration`): Release identity, outcomes,
//!   retry records, reports and selection strategies
//! - **Application Layer** (`application`): The shared regeneration
//!   pipeline
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): HTTP archive client, OIDC token cache,
//!   S3-backed release index and retry ledger, report writer, external
//!   producer process
//! - **Shared** (`shared`): Errors, exit codes and logging setup

pub mod adapters;
pub mod application;
pub mod cli;
pub mod config;
pub mod ports;
pub mod regeneration;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::filesystem::FileReportWriter;
    pub use crate::adapters::outbound::network::{OidcClientCredentials, TokenCache, TpaClient};
    pub use crate::adapters::outbound::process::CommandProducer;
    pub use crate::adapters::outbound::storage::{S3ReleaseSource, S3RetryLedger, S3Settings};
    pub use crate::application::dto::RegenerationRequest;
    pub use crate::application::use_cases::RegenerateSbomsUseCase;
    pub use crate::ports::outbound::{
        ReleaseSource, ReportSink, RetryLedger, SbomArchive, SbomProducer,
    };
    pub use crate::regeneration::domain::{
        FailureReason, RegenerationReport, Release, ReleaseGroup, ReleaseId, ReleaseKind,
        RetryRecord, SbomDocument, UploadOutcome,
    };
    pub use crate::regeneration::strategy::SelectionStrategy;
    pub use crate::shared::error::{ExitCode, RegenError};
    pub use crate::shared::Result;
}
