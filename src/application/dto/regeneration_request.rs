use crate::regeneration::domain::ReleaseKind;
use crate::regeneration::strategy::SelectionStrategy;
use crate::shared::error::RegenError;
use crate::shared::Result;
use std::path::PathBuf;

/// Default parallelism bound for release units.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// The resolved configuration for a regeneration run.
///
/// Constructed once at startup from parsed CLI arguments and
/// environment, read-only thereafter. Everything the pipeline needs to
/// know about a run lives here; the injected adapters carry their own
/// connection details.
#[derive(Debug, Clone)]
pub struct RegenerationRequest {
    /// How the candidate release set is populated.
    pub strategy: SelectionStrategy,
    /// The SBOM kind this run regenerates.
    pub kind: ReleaseKind,
    /// Where the final report is published.
    pub report_path: PathBuf,
    /// Parallelism bound for release units. Unbounded concurrency is
    /// disallowed to avoid overwhelming the archive API.
    pub concurrency: usize,
    /// Skip archive delivery and ledger mutations; outcomes become
    /// `Skipped("dry-run")`.
    pub dry_run: bool,
}

impl RegenerationRequest {
    pub fn new(
        strategy: SelectionStrategy,
        kind: ReleaseKind,
        report_path: PathBuf,
        concurrency: usize,
        dry_run: bool,
    ) -> Result<Self> {
        if concurrency == 0 {
            return Err(RegenError::Configuration {
                reason: "concurrency must be a non-zero integer".to_string(),
            }
            .into());
        }
        Ok(Self {
            strategy,
            kind,
            report_path,
            concurrency,
            dry_run,
        })
    }
}
