use crate::ports::outbound::ReleaseSource;
use crate::regeneration::domain::{ReleaseGroup, ReleaseId, ReleaseKind, SelectionMode};
use crate::shared::error::RegenError;
use crate::shared::Result;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// How the candidate release set for a run is populated.
///
/// The three variants share an identical downstream pipeline; selecting
/// one is done once at startup from parsed configuration. A tagged
/// union keeps the shared retry and report logic in one place with no
/// runtime type inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionStrategy {
    /// Operator-supplied identifiers, e.g. from an incident ticket.
    /// No external query; an empty list fails fast at construction.
    Explicit { release_ids: Vec<ReleaseId> },
    /// Every release created within `[since, until)` whose kind matches
    /// the requested SBOM type. The principal outage-recovery mechanism:
    /// rather than retrying indefinitely during an archive outage, all
    /// affected releases are deferred to one bulk run afterwards.
    OutageWindow {
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    },
    /// Identifiers read from a file, one per line, reprocessed regardless
    /// of ledger state (e.g. to pick up a generator bug fix).
    ReleaseIdFile { release_ids: Vec<ReleaseId> },
}

impl SelectionStrategy {
    /// Build the explicit-list variant; fails fast if the list is empty.
    pub fn explicit(release_ids: Vec<ReleaseId>) -> Result<Self> {
        if release_ids.is_empty() {
            return Err(RegenError::InvalidSelection {
                reason: "explicit release list is empty".to_string(),
            }
            .into());
        }
        Ok(SelectionStrategy::Explicit { release_ids })
    }

    /// Build the explicit-list variant from raw identifier strings,
    /// validating each one.
    pub fn explicit_from_raw(raw: &[String]) -> Result<Self> {
        let release_ids = raw
            .iter()
            .map(|id| {
                ReleaseId::new(id.clone()).map_err(|e| {
                    RegenError::InvalidSelection {
                        reason: format!("{:#}", e),
                    }
                    .into()
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::explicit(release_ids)
    }

    /// Build the outage-window variant; the interval must be non-empty.
    pub fn outage_window(since: DateTime<Utc>, until: DateTime<Utc>) -> Result<Self> {
        if since >= until {
            return Err(RegenError::InvalidSelection {
                reason: format!("--since ({}) must be before --until ({})", since, until),
            }
            .into());
        }
        Ok(SelectionStrategy::OutageWindow { since, until })
    }

    /// Build the release-id variant from a file of identifiers.
    pub fn from_release_id_file(path: &Path) -> Result<Self> {
        let release_ids = parse_release_id_file(path)?;
        if release_ids.is_empty() {
            return Err(RegenError::InvalidSelection {
                reason: format!("release-id file contains no identifiers: {}", path.display()),
            }
            .into());
        }
        Ok(SelectionStrategy::ReleaseIdFile { release_ids })
    }

    /// Populate the candidate set for this run.
    ///
    /// The outage-window variant depends on the release source; a
    /// source failure there is run-fatal because no partial progress is
    /// meaningful without the candidate set. The explicit variants were
    /// fully resolved at construction and only consult the source to
    /// warn about identifiers the release index does not know, without
    /// dropping them: the supplied list is authoritative.
    pub async fn populate(&self, source: &dyn ReleaseSource, kind: ReleaseKind) -> Result<ReleaseGroup> {
        match self {
            SelectionStrategy::Explicit { release_ids }
            | SelectionStrategy::ReleaseIdFile { release_ids } => {
                match source.releases_by_id(release_ids).await {
                    Ok(known) => {
                        for id in release_ids {
                            if !known.iter().any(|r| &r.id == id) {
                                warn!(release = %id, "identifier not present in the release index; processing anyway");
                            }
                        }
                    }
                    Err(e) => {
                        debug!(error = %format!("{:#}", e), "release index lookup failed; continuing with the supplied identifiers");
                    }
                }
                Ok(release_ids.iter().cloned().collect())
            }
            SelectionStrategy::OutageWindow { since, until } => {
                debug!(%since, %until, "querying release source for outage window");
                let releases = source
                    .releases_between(*since, *until, kind)
                    .await
                    .map_err(|e| RegenError::SourceUnavailable {
                        details: format!("{:#}", e),
                    })?;
                debug!(count = releases.len(), "release source returned candidates");
                Ok(releases.into_iter().map(|r| r.id).collect())
            }
        }
    }

    /// The selection mode recorded in the run report.
    pub fn mode(&self) -> SelectionMode {
        match self {
            SelectionStrategy::Explicit { .. } => SelectionMode::Explicit,
            SelectionStrategy::OutageWindow { since, until } => SelectionMode::OutageWindow {
                since: *since,
                until: *until,
            },
            SelectionStrategy::ReleaseIdFile { .. } => SelectionMode::ReleaseIdFile,
        }
    }
}

/// Parse release identifiers from a file, one per line.
///
/// Surrounding whitespace and quote characters are stripped, matching
/// what operators paste from tickets; blank lines are ignored.
fn parse_release_id_file(path: &Path) -> Result<Vec<ReleaseId>> {
    let content = std::fs::read_to_string(path).map_err(|e| RegenError::ReleaseIdFileError {
        path: PathBuf::from(path),
        details: e.to_string(),
    })?;

    let mut release_ids = Vec::new();
    for line in content.lines() {
        let trimmed = line.trim().trim_matches(|c| c == '"' || c == '\'');
        if trimmed.is_empty() {
            continue;
        }
        release_ids.push(ReleaseId::new(trimmed.to_string()).map_err(|e| {
            RegenError::ReleaseIdFileError {
                path: PathBuf::from(path),
                details: format!("{:#}", e),
            }
        })?);
    }
    Ok(release_ids)
}
