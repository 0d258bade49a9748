use crate::application::dto::RegenerationRequest;
use crate::ports::outbound::{ReleaseSource, ReportSink, RetryLedger, SbomArchive, SbomProducer};
use crate::regeneration::domain::{
    FailureReason, RegenerationReport, Release, ReleaseId, UploadOutcome,
};
use crate::shared::error::RegenError;
use crate::shared::Result;
use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Lifecycle of a regeneration run.
///
/// Transition to `Processing` requires a non-empty candidate set; a run
/// whose populated set is empty goes straight to `Completed` with an
/// empty report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Uninitialized,
    Populated,
    Processing,
    Completed,
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunState::Uninitialized => write!(f, "uninitialized"),
            RunState::Populated => write!(f, "populated"),
            RunState::Processing => write!(f, "processing"),
            RunState::Completed => write!(f, "completed"),
        }
    }
}

/// RegenerateSbomsUseCase - the shared regeneration pipeline
///
/// All three selection strategies feed this one pipeline: populate the
/// candidate set, then run each release through produce, upload and
/// ledger recording as an independent unit of work under a bounded
/// concurrency limit, and aggregate the outcomes into one report.
///
/// Per-release failures never abort the run. Only run-fatal conditions
/// (release source unavailable, ledger unreachable at startup) propagate
/// as errors, and in that case no report is written.
///
/// # Type Parameters
/// * `S` - ReleaseSource implementation
/// * `P` - SbomProducer implementation
/// * `A` - SbomArchive implementation
/// * `L` - RetryLedger implementation
/// * `R` - ReportSink implementation
pub struct RegenerateSbomsUseCase<S, P, A, L, R> {
    release_source: S,
    producer: P,
    archive: A,
    ledger: L,
    report_sink: R,
}

impl<S, P, A, L, R> RegenerateSbomsUseCase<S, P, A, L, R>
where
    S: ReleaseSource,
    P: SbomProducer,
    A: SbomArchive,
    L: RetryLedger,
    R: ReportSink,
{
    /// Creates a new use case with injected dependencies
    pub fn new(release_source: S, producer: P, archive: A, ledger: L, report_sink: R) -> Self {
        Self {
            release_source,
            producer,
            archive,
            ledger,
            report_sink,
        }
    }

    /// Executes a regeneration run.
    ///
    /// # Arguments
    /// * `request` - The resolved run configuration
    /// * `cancel` - Cooperative cancellation: units not yet started are
    ///   abandoned, in-flight units finish and record their outcome
    ///
    /// # Returns
    /// The published report. Per-release failures are inside the report,
    /// not in the error channel.
    pub async fn execute(
        &self,
        request: &RegenerationRequest,
        cancel: CancellationToken,
    ) -> Result<RegenerationReport> {
        let mut state = RunState::Uninitialized;
        debug!(%state, concurrency = request.concurrency, dry_run = request.dry_run, "starting run");

        // The ledger must be reachable before any processing: a run that
        // cannot record failures would silently lose releases.
        self.ledger
            .ping()
            .await
            .map_err(|e| RegenError::LedgerUnreachable {
                details: format!("{:#}", e),
            })?;

        let group = request
            .strategy
            .populate(&self.release_source, request.kind)
            .await?;
        state = RunState::Populated;
        info!(%state, candidates = group.len(), kind = %request.kind, "candidate set populated");

        let run_id = Uuid::new_v4();
        if group.is_empty() {
            info!("no matching releases; completing with an empty report");
            let report = RegenerationReport::from_outcomes(
                run_id,
                request.kind,
                request.strategy.mode(),
                Vec::new(),
            )?;
            self.report_sink.publish(&report).await?;
            state = RunState::Completed;
            debug!(%state, "run finished");
            return Ok(report);
        }

        state = RunState::Processing;
        debug!(%state, "processing release units");

        let outcomes: Vec<(ReleaseId, UploadOutcome)> = stream::iter(group)
            .map(|id| self.process_release(id, request, &cancel))
            .buffer_unordered(request.concurrency)
            .filter_map(|recorded| async move { recorded })
            .collect()
            .await;

        let report = RegenerationReport::from_outcomes(
            run_id,
            request.kind,
            request.strategy.mode(),
            outcomes,
        )?;
        self.report_sink.publish(&report).await?;

        state = RunState::Completed;
        info!(
            %state,
            delivered = report.totals.delivered,
            failed = report.totals.failed,
            skipped = report.totals.skipped,
            "run finished"
        );
        Ok(report)
    }

    /// Runs one release through produce, upload and ledger recording.
    ///
    /// Returns `None` only when the unit was abandoned before starting
    /// due to cancellation; such releases stay absent from the report
    /// and keep their prior ledger state.
    async fn process_release(
        &self,
        id: ReleaseId,
        request: &RegenerationRequest,
        cancel: &CancellationToken,
    ) -> Option<(ReleaseId, UploadOutcome)> {
        if cancel.is_cancelled() {
            debug!(release = %id, "cancelled before start; abandoning unit");
            return None;
        }

        let release = Release::new(id.clone(), request.kind, None);
        let outcome = self.produce_and_upload(&release, request.dry_run).await;

        match &outcome {
            UploadOutcome::Delivered => {
                info!(release = %id, "delivered");
            }
            UploadOutcome::Failed { reason } => {
                warn!(release = %id, %reason, "delivery failed");
            }
            UploadOutcome::Skipped { reason } => {
                info!(release = %id, reason, "skipped");
            }
        }

        if !request.dry_run {
            self.record_in_ledger(&release, &outcome).await;
        }

        Some((id, outcome))
    }

    async fn produce_and_upload(&self, release: &Release, dry_run: bool) -> UploadOutcome {
        let document = match self.producer.produce(release).await {
            Ok(Some(document)) => document,
            Ok(None) => return UploadOutcome::skipped("no document required"),
            Err(e) => {
                return UploadOutcome::failed(FailureReason::Produce {
                    details: format!("{:#}", e),
                });
            }
        };

        if dry_run {
            return UploadOutcome::skipped("dry-run");
        }

        match self.archive.upload(&document).await {
            Ok(outcome) => outcome,
            Err(e) => {
                // Infrastructure faults outside the classification path
                // count as a failed delivery for this release.
                warn!(release = %release.id, error = %format!("{:#}", e), "archive upload errored");
                UploadOutcome::failed(FailureReason::Transient)
            }
        }
    }

    /// Applies the ledger invariant for a recorded outcome: `Delivered`
    /// removes any pending record, `Failed` inserts or updates one so a
    /// future outage-recovery run sees the release. Ledger write errors
    /// are logged and do not change the outcome; the report still
    /// enumerates the release.
    async fn record_in_ledger(&self, release: &Release, outcome: &UploadOutcome) {
        match outcome {
            UploadOutcome::Delivered => {
                if let Err(e) = self.ledger.remove(&release.id).await {
                    warn!(release = %release.id, error = %format!("{:#}", e), "failed to remove ledger record");
                }
            }
            UploadOutcome::Failed { .. } => {
                if let Err(e) = self.ledger.upsert(&release.id, release.kind).await {
                    warn!(release = %release.id, error = %format!("{:#}", e), "failed to upsert ledger record");
                }
            }
            UploadOutcome::Skipped { .. } => {}
        }
    }
}
